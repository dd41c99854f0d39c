//! Output record definitions
//!
//! A record is always complete: every column is present and absent values are
//! empty strings, so CSV rows stay aligned with the header.

use std::fmt;

/// CSV header, in output order
pub const COLUMNS: [&str; 23] = [
    "judul",
    "nomor",
    "tingkat_proses",
    "klasifikasi",
    "kata_kunci",
    "tahun",
    "tanggal_register",
    "lembaga_peradilan",
    "jenis_lembaga_peradilan",
    "hakim_ketua",
    "hakim_anggota",
    "panitera",
    "amar",
    "amar_lainnya",
    "catatan_amar",
    "tanggal_musyawarah",
    "tanggal_dibacakan",
    "kaidah",
    "abstrak",
    "link",
    "link_pdf",
    "file_name_pdf",
    "text_pdf",
];

/// A labelled row of the decision metadata table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    CaseNumber,
    ProcessLevel,
    Classification,
    Keywords,
    Year,
    RegistrationDate,
    Court,
    CourtType,
    PresidingJudge,
    PanelJudges,
    Registrar,
    Verdict,
    OtherVerdict,
    VerdictNotes,
    DeliberationDate,
    ReadingDate,
    LegalPrinciple,
    Abstract,
}

impl DetailField {
    /// Every field, in column order
    pub const ALL: [DetailField; 18] = [
        Self::CaseNumber,
        Self::ProcessLevel,
        Self::Classification,
        Self::Keywords,
        Self::Year,
        Self::RegistrationDate,
        Self::Court,
        Self::CourtType,
        Self::PresidingJudge,
        Self::PanelJudges,
        Self::Registrar,
        Self::Verdict,
        Self::OtherVerdict,
        Self::VerdictNotes,
        Self::DeliberationDate,
        Self::ReadingDate,
        Self::LegalPrinciple,
        Self::Abstract,
    ];

    /// Text of the label cell as printed on the detail page
    ///
    /// Matching is by substring, so the first cell containing the label wins.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CaseNumber => "Nomor",
            Self::ProcessLevel => "Tingkat Proses",
            Self::Classification => "Klasifikasi",
            Self::Keywords => "Kata Kunci",
            Self::Year => "Tahun",
            Self::RegistrationDate => "Tanggal Register",
            Self::Court => "Lembaga Peradilan",
            Self::CourtType => "Jenis Lembaga Peradilan",
            Self::PresidingJudge => "Hakim Ketua",
            Self::PanelJudges => "Hakim Anggota",
            Self::Registrar => "Panitera",
            Self::Verdict => "Amar",
            Self::OtherVerdict => "Amar Lainnya",
            Self::VerdictNotes => "Catatan Amar",
            Self::DeliberationDate => "Tanggal Musyawarah",
            Self::ReadingDate => "Tanggal Dibacakan",
            Self::LegalPrinciple => "Kaidah",
            Self::Abstract => "Abstrak",
        }
    }
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A downloaded decision document
///
/// `Artifact::default()` is the empty triple used whenever a detail page has
/// no document or the document could not be processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute download URL
    pub link: String,

    /// Name the document was stored under in the artifact directory
    pub filename: String,

    /// Converted plain text with template boilerplate removed
    pub text: String,
}

impl Artifact {
    pub fn is_empty(&self) -> bool {
        self.link.is_empty() && self.filename.is_empty() && self.text.is_empty()
    }
}

/// One decision, as written to the output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub case_number: String,
    pub process_level: String,
    pub classification: String,
    pub keywords: String,
    pub year: String,
    pub registration_date: String,
    pub court: String,
    pub court_type: String,
    pub presiding_judge: String,
    pub panel_judges: String,
    pub registrar: String,
    pub verdict: String,
    pub other_verdict: String,
    pub verdict_notes: String,
    pub deliberation_date: String,
    pub reading_date: String,
    pub legal_principle: String,
    pub abstract_text: String,
    pub source_link: String,
    pub artifact_link: String,
    pub artifact_filename: String,
    pub artifact_text: String,
}

impl Record {
    /// Number of columns every record serializes to
    pub const FIELD_COUNT: usize = COLUMNS.len();

    /// Creates an empty record for the given detail page
    pub fn new(source_link: impl Into<String>) -> Self {
        Self {
            source_link: source_link.into(),
            ..Self::default()
        }
    }

    /// Sets the value of a metadata table field
    pub fn set_detail(&mut self, field: DetailField, value: String) {
        let slot = match field {
            DetailField::CaseNumber => &mut self.case_number,
            DetailField::ProcessLevel => &mut self.process_level,
            DetailField::Classification => &mut self.classification,
            DetailField::Keywords => &mut self.keywords,
            DetailField::Year => &mut self.year,
            DetailField::RegistrationDate => &mut self.registration_date,
            DetailField::Court => &mut self.court,
            DetailField::CourtType => &mut self.court_type,
            DetailField::PresidingJudge => &mut self.presiding_judge,
            DetailField::PanelJudges => &mut self.panel_judges,
            DetailField::Registrar => &mut self.registrar,
            DetailField::Verdict => &mut self.verdict,
            DetailField::OtherVerdict => &mut self.other_verdict,
            DetailField::VerdictNotes => &mut self.verdict_notes,
            DetailField::DeliberationDate => &mut self.deliberation_date,
            DetailField::ReadingDate => &mut self.reading_date,
            DetailField::LegalPrinciple => &mut self.legal_principle,
            DetailField::Abstract => &mut self.abstract_text,
        };
        *slot = value;
    }

    /// Returns the value of a metadata table field
    pub fn detail(&self, field: DetailField) -> &str {
        match field {
            DetailField::CaseNumber => &self.case_number,
            DetailField::ProcessLevel => &self.process_level,
            DetailField::Classification => &self.classification,
            DetailField::Keywords => &self.keywords,
            DetailField::Year => &self.year,
            DetailField::RegistrationDate => &self.registration_date,
            DetailField::Court => &self.court,
            DetailField::CourtType => &self.court_type,
            DetailField::PresidingJudge => &self.presiding_judge,
            DetailField::PanelJudges => &self.panel_judges,
            DetailField::Registrar => &self.registrar,
            DetailField::Verdict => &self.verdict,
            DetailField::OtherVerdict => &self.other_verdict,
            DetailField::VerdictNotes => &self.verdict_notes,
            DetailField::DeliberationDate => &self.deliberation_date,
            DetailField::ReadingDate => &self.reading_date,
            DetailField::LegalPrinciple => &self.legal_principle,
            DetailField::Abstract => &self.abstract_text,
        }
    }

    /// Fills the artifact columns
    pub fn set_artifact(&mut self, artifact: Artifact) {
        self.artifact_link = artifact.link;
        self.artifact_filename = artifact.filename;
        self.artifact_text = artifact.text;
    }

    /// Returns the record's values in column order
    pub fn to_row(&self) -> [&str; 23] {
        [
            self.title.as_str(),
            self.case_number.as_str(),
            self.process_level.as_str(),
            self.classification.as_str(),
            self.keywords.as_str(),
            self.year.as_str(),
            self.registration_date.as_str(),
            self.court.as_str(),
            self.court_type.as_str(),
            self.presiding_judge.as_str(),
            self.panel_judges.as_str(),
            self.registrar.as_str(),
            self.verdict.as_str(),
            self.other_verdict.as_str(),
            self.verdict_notes.as_str(),
            self.deliberation_date.as_str(),
            self.reading_date.as_str(),
            self.legal_principle.as_str(),
            self.abstract_text.as_str(),
            self.source_link.as_str(),
            self.artifact_link.as_str(),
            self.artifact_filename.as_str(),
            self.artifact_text.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_matches_header_width() {
        let record = Record::new("https://example.com/direktori/putusan/abc.html");
        let row = record.to_row();
        assert_eq!(row.len(), COLUMNS.len());
        assert_eq!(Record::FIELD_COUNT, 23);
    }

    #[test]
    fn test_new_record_is_all_empty_except_link() {
        let record = Record::new("https://example.com/d/1");
        for (column, value) in COLUMNS.iter().zip(record.to_row()) {
            if *column == "link" {
                assert_eq!(value, "https://example.com/d/1");
            } else {
                assert!(value.is_empty(), "{} should be empty", column);
            }
        }
    }

    #[test]
    fn test_detail_fields_land_in_their_columns() {
        let mut record = Record::default();
        for (i, field) in DetailField::ALL.iter().enumerate() {
            record.set_detail(*field, format!("value-{}", i));
        }

        let row = record.to_row();
        // Detail fields occupy columns 1..=18, right after the title
        for (i, field) in DetailField::ALL.iter().enumerate() {
            assert_eq!(row[i + 1], format!("value-{}", i));
            assert_eq!(record.detail(*field), row[i + 1]);
        }
        assert_eq!(row[0], "");
        assert_eq!(row[19], "");
    }

    #[test]
    fn test_set_artifact() {
        let mut record = Record::new("https://example.com/d/1");
        record.set_artifact(Artifact {
            link: "https://example.com/pdf/1".to_string(),
            filename: "putusan 1.pdf".to_string(),
            text: "Menimbang".to_string(),
        });

        let row = record.to_row();
        assert_eq!(&row[20..], &["https://example.com/pdf/1", "putusan 1.pdf", "Menimbang"]);
    }

    #[test]
    fn test_artifact_default_is_empty() {
        assert!(Artifact::default().is_empty());
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut labels: Vec<_> = DetailField::ALL.iter().map(|f| f.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), DetailField::ALL.len());
    }
}
