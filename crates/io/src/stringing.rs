//! Pasted stringing chart reports: per-section span totals for the primary
//! conductor and the neutral.
//!
//! Both charts share one layout. Each section opens with
//!
//! ```text
//! Stringing Chart Report
//!
//! Circuit '<type>' Section #<n> from structure #<a> to structure #<b>, ... Span
//! <span lines>
//! ```
//!
//! and ends at the next blank line. A span line starts with the span length.

use std::sync::OnceLock;

use polegrid_recon::ReconError;
use regex::Regex;

use crate::Parsed;

pub const PRIMARY_SOURCE: &str = "stringing_primary";
pub const NEUTRAL_SOURCE: &str = "stringing_neutral";

pub const PRIMARY_HEADERS: [&str; 7] = [
    "Section #",
    "Structure -> Structure",
    "Circuit Type",
    "Circuit Value",
    "Span Length",
    "Result",
    "Sequences",
];

pub const NEUTRAL_HEADERS: [&str; 4] = [
    "Section #",
    "Sequence #s",
    "Total Span Length",
    "Circuit Type",
];

/// Circuit type fragment that marks a span guy section in the neutral chart.
const SPAN_GUY: &str = "Span Guy";

fn section_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?s)Stringing Chart Report\n\nCircuit '(.*?)' Section #(.*?) from structure #(.*?) to structure #(.*?),.*?Span\n(.*?)\n\n",
        )
        .expect("static pattern")
    })
}

fn span_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s+(\d+\.\d+)\s+").expect("static pattern"))
}

fn sequence_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}").expect("static pattern"))
}

fn phase_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)PH").expect("static pattern"))
}

/// One primary conductor section.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryStringingRow {
    pub section: String,
    /// `"<from> -> <to>"`
    pub structures: String,
    pub circuit_type: String,
    /// Phase count taken from `<n>PH` in the circuit type.
    pub circuit_value: u32,
    pub span_length: f64,
    /// Span length times phase count: conductor length for the section.
    pub result: f64,
    /// Every 4-digit structure number in the span lines, comma separated.
    pub sequences: String,
}

impl PrimaryStringingRow {
    pub fn cells(&self) -> [String; 7] {
        [
            self.section.clone(),
            self.structures.clone(),
            self.circuit_type.clone(),
            self.circuit_value.to_string(),
            format!("{:.2}", self.span_length),
            format!("{:.2}", self.result),
            self.sequences.clone(),
        ]
    }
}

/// One neutral section.
#[derive(Debug, Clone, PartialEq)]
pub struct NeutralStringingRow {
    pub section: String,
    /// `"<from> - <to>"`
    pub sequences: String,
    pub total_span_length: f64,
    pub circuit_type: String,
}

impl NeutralStringingRow {
    pub fn cells(&self) -> [String; 4] {
        [
            self.section.clone(),
            self.sequences.clone(),
            format!("{:.2}", self.total_span_length),
            self.circuit_type.clone(),
        ]
    }
}

/// Both stringing charts of a project, in report order.
#[derive(Debug, Clone, Default)]
pub struct StringingReport {
    pub primary: Vec<PrimaryStringingRow>,
    pub neutral: Vec<NeutralStringingRow>,
}

impl StringingReport {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.neutral.is_empty()
    }
}

struct Section {
    circuit_type: String,
    section: String,
    from: String,
    to: String,
    spans: String,
}

impl Section {
    fn span_total(&self) -> f64 {
        span_pattern()
            .captures_iter(&self.spans)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .sum()
    }
}

fn sections(text: &str) -> Vec<Section> {
    // The last section of a trimmed paste has no closing blank line
    let text = format!("{}\n\n", text.replace("\r\n", "\n").trim_end());

    section_pattern()
        .captures_iter(&text)
        .map(|caps| {
            let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
            Section {
                circuit_type: group(1).trim().to_string(),
                section: group(2).trim().to_string(),
                from: group(3).trim().to_string(),
                to: group(4).trim().to_string(),
                // Lets the first span line match like the rest
                spans: format!("\n{}", group(5)),
            }
        })
        .collect()
}

/// Parse the primary conductor chart. Sections whose circuit type carries
/// no `<n>PH` phase count are skipped.
pub fn parse_primary(text: &str) -> Parsed<Vec<PrimaryStringingRow>> {
    let mut parsed = Parsed::<Vec<PrimaryStringingRow>>::default();

    for section in sections(text) {
        let circuit_value = phase_pattern()
            .captures(&section.circuit_type)
            .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok());
        let Some(circuit_value) = circuit_value else {
            parsed.skip(
                PRIMARY_SOURCE,
                ReconError::MissingPhaseCount {
                    section: section.section.clone(),
                    circuit: section.circuit_type.clone(),
                },
            );
            continue;
        };

        let span_length = section.span_total();
        let sequences: Vec<&str> = sequence_pattern()
            .find_iter(&section.spans)
            .map(|m| m.as_str())
            .collect();

        parsed.data.push(PrimaryStringingRow {
            structures: format!("{} -> {}", section.from, section.to),
            circuit_value,
            span_length,
            result: span_length * f64::from(circuit_value),
            sequences: sequences.join(", "),
            section: section.section,
            circuit_type: section.circuit_type,
        });
    }

    log::debug!("[{PRIMARY_SOURCE}] {} sections", parsed.data.len());
    parsed
}

/// Parse the neutral chart. Span guy sections are left out.
pub fn parse_neutral(text: &str) -> Parsed<Vec<NeutralStringingRow>> {
    let mut parsed = Parsed::<Vec<NeutralStringingRow>>::default();

    for section in sections(text) {
        if section.circuit_type.contains(SPAN_GUY) {
            log::debug!("[{NEUTRAL_SOURCE}] skipping span guy section #{}", section.section);
            continue;
        }
        parsed.data.push(NeutralStringingRow {
            sequences: format!("{} - {}", section.from, section.to),
            total_span_length: section.span_total(),
            section: section.section,
            circuit_type: section.circuit_type,
        });
    }

    log::debug!("[{NEUTRAL_SOURCE}] {} sections", parsed.data.len());
    parsed
}
