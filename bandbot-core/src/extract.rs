use crate::{
    error::SchemaError,
    model::{BandConditions, BandInfo, FeedInfo, VhfConditions},
    xml::{FeedDocument, XmlElement},
};

const CONDITIONS_SECTION: &str = "calculatedconditions";
const VHF_SECTION: &str = "calculatedvhfconditions";
const CALCULATED_PREFIX: &str = "calculated";

/// Reshape a feed document into band, VHF and scalar info mappings.
///
/// Fails as a whole if either calculated section is missing; there is no
/// partial result.
pub fn extract(document: &FeedDocument) -> Result<BandInfo, SchemaError> {
    let data = document
        .root
        .children
        .first()
        .ok_or_else(|| SchemaError::MissingData(document.root.name.clone()))?;

    let conditions =
        data.child(CONDITIONS_SECTION).ok_or(SchemaError::MissingSection(CONDITIONS_SECTION))?;
    let vhf_conditions =
        data.child(VHF_SECTION).ok_or(SchemaError::MissingSection(VHF_SECTION))?;

    Ok(BandInfo {
        bands: extract_bands(conditions)?,
        vhf: extract_vhf(vhf_conditions)?,
        info: extract_info(data),
    })
}

fn extract_bands(section: &XmlElement) -> Result<BandConditions, SchemaError> {
    let mut bands = BandConditions::new();

    for band in section.descendants("band") {
        let name = required(band, "band", "name")?;
        let time = required(band, "band", "time")?;
        let label = Some(band.text_or_empty().to_string());

        let entry = bands.entry(name.to_string()).or_default();
        match time {
            "day" => entry.day = label,
            "night" => entry.night = label,
            other => return Err(SchemaError::UnknownBandTime(other.to_string())),
        }
    }

    Ok(bands)
}

fn extract_vhf(section: &XmlElement) -> Result<VhfConditions, SchemaError> {
    let mut vhf = VhfConditions::new();

    for phenomenon in section.descendants("phenomenon") {
        let name = required(phenomenon, "phenomenon", "name")?;
        let location = required(phenomenon, "phenomenon", "location")?;

        vhf.entry(name.to_string())
            .or_default()
            .insert(location.to_string(), phenomenon.text_or_empty().to_string());
    }

    Ok(vhf)
}

fn extract_info(data: &XmlElement) -> FeedInfo {
    data.children
        .iter()
        .filter(|el| !el.name.starts_with(CALCULATED_PREFIX))
        .map(|el| (el.name.clone(), el.text_or_empty().trim().to_string()))
        .collect()
}

fn required<'a>(
    el: &'a XmlElement,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, SchemaError> {
    el.attribute(attribute).ok_or(SchemaError::MissingAttribute { element, attribute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{SAMPLE_FEED, feed_with};

    fn parse(body: &str) -> FeedDocument {
        FeedDocument::parse(body).expect("fixture must be valid xml")
    }

    #[test]
    fn groups_bands_by_name_then_time_in_document_order() {
        let info = extract(&parse(SAMPLE_FEED)).expect("sample feed extracts");

        let names: Vec<_> = info.bands.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["80m-40m", "30m-20m"]);

        let low = &info.bands["80m-40m"];
        assert_eq!(low.day.as_deref(), Some("Fair"));
        assert_eq!(low.night.as_deref(), Some("Good"));
        assert_eq!(info.bands["30m-20m"].night.as_deref(), Some("Poor"));
    }

    #[test]
    fn later_duplicates_overwrite_earlier_entries() {
        let body = feed_with(
            &[("80m", "day", "Poor"), ("40m", "day", "Fair"), ("80m", "day", "Good")],
            Some(""),
        );
        let info = extract(&parse(&body)).expect("extracts");

        assert_eq!(info.bands.len(), 2);
        assert_eq!(info.bands["80m"].day.as_deref(), Some("Good"));
        // Overwriting keeps the first-seen position.
        assert_eq!(info.bands.get_index(0).map(|(k, _)| k.as_str()), Some("80m"));
    }

    #[test]
    fn labels_pass_through_unchanged() {
        let body = feed_with(&[("6m", "day", " Band Closed ")], Some(""));
        let info = extract(&parse(&body)).expect("extracts");
        assert_eq!(info.bands["6m"].day.as_deref(), Some(" Band Closed "));
        assert_eq!(info.bands["6m"].night, None);
    }

    #[test]
    fn groups_vhf_by_phenomenon_then_location() {
        let info = extract(&parse(SAMPLE_FEED)).expect("sample feed extracts");

        assert_eq!(info.vhf.len(), 2);
        assert_eq!(info.vhf["vhf-aurora"]["northern_hemi"], "Band Closed");
        let eskip: Vec<_> = info.vhf["E-Skip"].keys().map(String::as_str).collect();
        assert_eq!(eskip, vec!["europe", "north_america"]);
        assert_eq!(info.vhf["E-Skip"]["north_america"], "50MHz ES");
    }

    #[test]
    fn info_skips_calculated_sections_and_trims_values() {
        let info = extract(&parse(SAMPLE_FEED)).expect("sample feed extracts");

        assert_eq!(info.field("updated"), Some("16 Oct 2026 1200 GMT"));
        assert_eq!(info.field("aindex"), Some("8"));
        assert_eq!(info.field("kindex"), Some("2"));
        assert_eq!(info.field("source"), Some("N0NBH"));
        assert!(info.info.keys().all(|k| !k.starts_with("calculated")));
    }

    #[test]
    fn missing_vhf_section_fails_the_whole_extraction() {
        let body = feed_with(&[("80m", "day", "Good")], None);
        let err = extract(&parse(&body)).unwrap_err();
        assert_eq!(err, SchemaError::MissingSection("calculatedvhfconditions"));
    }

    #[test]
    fn missing_band_section_is_a_schema_error() {
        let body = "<solar><solardata><calculatedvhfconditions/></solardata></solar>";
        let err = extract(&parse(body)).unwrap_err();
        assert_eq!(err, SchemaError::MissingSection("calculatedconditions"));
    }

    #[test]
    fn empty_root_is_a_schema_error() {
        let err = extract(&parse("<solar/>")).unwrap_err();
        assert_eq!(err, SchemaError::MissingData("solar".to_string()));
    }

    #[test]
    fn band_without_time_is_a_schema_error() {
        let body = "<solar><solardata><calculatedconditions><band name=\"80m\">Good</band>\
                    </calculatedconditions><calculatedvhfconditions/></solardata></solar>";
        let err = extract(&parse(body)).unwrap_err();
        assert_eq!(err, SchemaError::MissingAttribute { element: "band", attribute: "time" });
    }

    #[test]
    fn unknown_band_time_is_a_schema_error() {
        let body = feed_with(&[("80m", "dusk", "Good")], Some(""));
        let err = extract(&parse(&body)).unwrap_err();
        assert_eq!(err, SchemaError::UnknownBandTime("dusk".to_string()));
    }
}
