//! Plain-text and HTML reports built from [`BandInfo`].

use std::fmt::Write as _;

use crate::model::BandInfo;

const MISSING: &str = "n/a";

/// Condition labels that get a color in HTML output.
const LABEL_COLORS: &[(&str, &str)] = &[("Good", "green"), ("Fair", "#ffbf00"), ("Poor", "red")];

pub fn render_text(info: &BandInfo) -> String {
    let rows: Vec<[&str; 3]> = info
        .bands
        .iter()
        .map(|(name, dn)| {
            [name.as_str(), dn.day.as_deref().unwrap_or(""), dn.night.as_deref().unwrap_or("")]
        })
        .collect();

    let mut widths = [4, 3, 5];
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = header(info);
    out.push('\n');
    push_row(&mut out, &["Band", "Day", "Night"], &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

pub fn render_html(info: &BandInfo) -> String {
    let mut out = format!("<h4>{}</h4>\n<table>\n", escape(&header(info)));
    out.push_str("<tr><th>Band</th><th>Day</th><th>Night</th></tr>\n");

    for (name, dn) in &info.bands {
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(name),
            colored(dn.day.as_deref().unwrap_or("")),
            colored(dn.night.as_deref().unwrap_or("")),
        );
    }

    out.push_str("</table>");
    out
}

pub fn render_vhf_text(info: &BandInfo) -> String {
    let mut out = vhf_header(info);
    out.push('\n');

    for (phenomenon, locations) in &info.vhf {
        let _ = writeln!(out, "{}", display_name(phenomenon));
        for (location, status) in locations {
            let _ = writeln!(out, "  {}: {}", display_name(location), status);
        }
    }

    out
}

pub fn render_vhf_html(info: &BandInfo) -> String {
    let mut out = format!("<h4>{}</h4>\n", escape(&vhf_header(info)));

    for (phenomenon, locations) in &info.vhf {
        let _ = writeln!(out, "<h5>{}</h5>", escape(&display_name(phenomenon)));
        for (location, status) in locations {
            let _ = writeln!(
                out,
                "<b>{}:</b> {}<br/>",
                escape(&display_name(location)),
                escape(status)
            );
        }
    }

    out
}

/// Every scalar feed field, one per line.
pub fn render_solar_text(info: &BandInfo) -> String {
    let mut out = String::from("Solar data\n");
    for (name, value) in &info.info {
        let _ = writeln!(out, "{name}: {value}");
    }
    out
}

pub fn render_solar_html(info: &BandInfo) -> String {
    let mut out = String::from("<h4>Solar data</h4>\n");
    for (name, value) in &info.info {
        let _ = writeln!(out, "<b>{}:</b> {}<br/>", escape(name), escape(value));
    }
    out
}

/// Structured dump of the extracted data.
pub fn render_json(info: &BandInfo) -> serde_json::Result<String> {
    serde_json::to_string_pretty(info)
}

/// Turn a raw feed key like `vhf-aurora` or `north_america` into `VHF Aurora` / `North America`.
pub fn display_name(raw: &str) -> String {
    let titled = raw
        .split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    // Title-casing leaves "vhf" as "Vhf" at a word start and "vhf" inside one.
    titled.replace("Vhf", "VHF").replace("vhf", "VHF")
}

fn header(info: &BandInfo) -> String {
    let field = |name| info.field(name).unwrap_or(MISSING);
    format!(
        "Band conditions as of {}: SFI {}, SN {}, A {}, K {}",
        field("updated"),
        field("solarflux"),
        field("sunspots"),
        field("aindex"),
        field("kindex"),
    )
}

fn vhf_header(info: &BandInfo) -> String {
    format!("VHF conditions as of {}", info.field("updated").unwrap_or(MISSING))
}

fn push_row(out: &mut String, cells: &[&str; 3], widths: &[usize; 3]) {
    let line = format!(
        "{:<w0$}  {:<w1$}  {}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

fn colored(label: &str) -> String {
    match LABEL_COLORS.iter().find(|(known, _)| *known == label) {
        Some((_, color)) => format!(r#"<font color="{color}">{label}</font>"#),
        None => escape(label),
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
