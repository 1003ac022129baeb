//! Shared feed documents and a fake feed source for unit tests.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{error::FetchError, feed::FeedSource, xml::FeedDocument};

pub const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<solar>
  <solardata>
    <source url="http://www.hamqsl.com/solar.html">N0NBH</source>
    <updated> 16 Oct 2026 1200 GMT</updated>
    <solarflux>152</solarflux>
    <aindex> 8</aindex>
    <kindex>2 </kindex>
    <sunspots>118</sunspots>
    <xray>C1.4</xray>
    <calculatedconditions>
      <band name="80m-40m" time="day">Fair</band>
      <band name="30m-20m" time="day">Good</band>
      <band name="80m-40m" time="night">Good</band>
      <band name="30m-20m" time="night">Poor</band>
    </calculatedconditions>
    <calculatedvhfconditions>
      <phenomenon name="vhf-aurora" location="northern_hemi">Band Closed</phenomenon>
      <phenomenon name="E-Skip" location="europe">Band Closed</phenomenon>
      <phenomenon name="E-Skip" location="north_america">50MHz ES</phenomenon>
    </calculatedvhfconditions>
  </solardata>
</solar>
"#;

/// Build a minimal feed with the given band entries and VHF section body.
pub fn feed_with(bands: &[(&str, &str, &str)], vhf: Option<&str>) -> String {
    let band_xml: String = bands
        .iter()
        .map(|(name, time, label)| format!(r#"<band name="{name}" time="{time}">{label}</band>"#))
        .collect();
    let vhf_xml = vhf
        .map(|body| format!("<calculatedvhfconditions>{body}</calculatedvhfconditions>"))
        .unwrap_or_default();

    format!(
        "<solar><solardata><updated>now</updated>\
         <calculatedconditions>{band_xml}</calculatedconditions>{vhf_xml}\
         </solardata></solar>"
    )
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub calls: AtomicUsize,
    body: Mutex<Option<String>>,
}

impl FakeState {
    pub fn set_body(&self, body: Option<&str>) {
        *self.body.lock().expect("fake source lock") = body.map(str::to_string);
    }
}

/// Feed source serving a fixed body and counting fetches.
/// A `None` body yields an XML error, standing in for a broken transfer.
#[derive(Debug)]
pub struct FakeSource {
    state: Arc<FakeState>,
}

impl FakeSource {
    pub fn serving(body: Option<&str>) -> (Self, Arc<FakeState>) {
        let state = Arc::new(FakeState::default());
        state.set_body(body);
        (Self { state: Arc::clone(&state) }, state)
    }
}

#[async_trait]
impl FeedSource for FakeSource {
    async fn fetch(&self) -> Result<FeedDocument, FetchError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.state.body.lock().expect("fake source lock").clone();
        FeedDocument::parse(body.as_deref().unwrap_or("<solar>"))
    }
}
