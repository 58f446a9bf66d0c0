//! Liability-form layouts.
//!
//! Each form type maps to a fixed multi-page layout. The only logic here is
//! the presence check of required fields and which optional blocks a layout
//! includes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FormError;
use crate::models::FormType;

/// Layout family a form type is printed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormLayout {
    Minor,
    AdultOrChaperone,
    Clergy,
}

impl From<FormType> for FormLayout {
    fn from(form_type: FormType) -> Self {
        match form_type {
            FormType::Minor => FormLayout::Minor,
            FormType::Adult | FormType::Chaperone => FormLayout::AdultOrChaperone,
            FormType::Clergy => FormLayout::Clergy,
        }
    }
}

impl FormLayout {
    pub fn title(&self) -> &'static str {
        match self {
            FormLayout::Minor => "Youth Participant Liability and Medical Release",
            FormLayout::AdultOrChaperone => "Adult and Chaperone Liability Release",
            FormLayout::Clergy => "Clergy Liability Release",
        }
    }
}

/// Form submission as collected from the participant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LiabilityFormData {
    pub participant_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub parish_or_group: Option<String>,

    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,

    pub medical_conditions: Option<String>,
    pub allergies: Option<String>,
    pub medications: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_policy_number: Option<String>,

    // minor
    pub parent_guardian_name: Option<String>,
    pub parent_guardian_phone: Option<String>,

    // chaperone
    pub safe_environment_certificate: Option<String>,
    pub safe_environment_completed_on: Option<NaiveDate>,

    // clergy
    pub diocese: Option<String>,
    pub faculties_statement: Option<String>,

    pub signature_name: Option<String>,
    pub signed_on: Option<NaiveDate>,
    pub photo_release: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSection {
    pub heading: String,
    pub fields: Vec<DocumentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub number: u32,
    pub sections: Vec<DocumentSection>,
}

/// Renderer-independent document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub title: String,
    pub layout: FormLayout,
    pub form_type: FormType,
    pub pages: Vec<DocumentPage>,
}

impl FormDocument {
    pub fn section(&self, heading: &str) -> Option<&DocumentSection> {
        self.pages
            .iter()
            .flat_map(|page| page.sections.iter())
            .find(|section| section.heading == heading)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn require_text(value: &Option<String>, name: &'static str) -> Result<(), FormError> {
    if is_blank(value) {
        return Err(FormError::MissingField(name));
    }
    Ok(())
}

fn require_date(value: &Option<NaiveDate>, name: &'static str) -> Result<(), FormError> {
    value.map(|_| ()).ok_or(FormError::MissingField(name))
}

/// Presence checks for the fields the form type requires
pub fn validate(form_type: FormType, data: &LiabilityFormData) -> Result<(), FormError> {
    require_text(&data.participant_name, "participantName")?;
    require_date(&data.date_of_birth, "dateOfBirth")?;
    require_text(&data.emergency_contact_name, "emergencyContactName")?;
    require_text(&data.emergency_contact_phone, "emergencyContactPhone")?;

    match form_type {
        FormType::Minor => {
            require_text(&data.parent_guardian_name, "parentGuardianName")?;
            require_text(&data.parent_guardian_phone, "parentGuardianPhone")?;
        }
        FormType::Chaperone => {
            require_text(&data.safe_environment_certificate, "safeEnvironmentCertificate")?;
            require_date(&data.safe_environment_completed_on, "safeEnvironmentCompletedOn")?;
        }
        FormType::Clergy => {
            require_text(&data.diocese, "diocese")?;
            require_text(&data.faculties_statement, "facultiesStatement")?;
        }
        FormType::Adult => {}
    }

    require_text(&data.signature_name, "signatureName")?;
    require_date(&data.signed_on, "signedOn")?;
    Ok(())
}

fn text(value: &Option<String>, fallback: &str) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn date(value: &Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn field(label: &str, value: String) -> DocumentField {
    DocumentField {
        label: label.to_string(),
        value,
    }
}

fn section(heading: &str, fields: Vec<DocumentField>) -> DocumentSection {
    DocumentSection {
        heading: heading.to_string(),
        fields,
    }
}

/// Validate `data` and lay it out for `form_type`.
///
/// Page 1 holds identity and contacts, page 2 medical and insurance, page 3
/// the variant block (if any) and the release and signature.
pub fn build_document(
    form_type: FormType,
    data: &LiabilityFormData,
) -> Result<FormDocument, FormError> {
    validate(form_type, data)?;
    let layout = FormLayout::from(form_type);

    let mut first = vec![
        section(
            "Participant",
            vec![
                field("Name", text(&data.participant_name, "")),
                field("Date of Birth", date(&data.date_of_birth)),
                field("Gender", text(&data.gender, "")),
                field("Parish / Group", text(&data.parish_or_group, "")),
            ],
        ),
        section(
            "Emergency Contact",
            vec![
                field("Name", text(&data.emergency_contact_name, "")),
                field("Phone", text(&data.emergency_contact_phone, "")),
            ],
        ),
    ];
    if layout == FormLayout::Minor {
        first.push(section(
            "Parent / Guardian",
            vec![
                field("Name", text(&data.parent_guardian_name, "")),
                field("Phone", text(&data.parent_guardian_phone, "")),
            ],
        ));
    }

    let second = vec![
        section(
            "Medical Information",
            vec![
                field("Medical Conditions", text(&data.medical_conditions, "None")),
                field("Allergies", text(&data.allergies, "None")),
                field("Medications", text(&data.medications, "None")),
            ],
        ),
        section(
            "Insurance",
            vec![
                field("Provider", text(&data.insurance_provider, "None")),
                field("Policy Number", text(&data.insurance_policy_number, "")),
            ],
        ),
    ];

    let mut third = Vec::new();
    match form_type {
        FormType::Chaperone => third.push(section(
            "Safe Environment Certification",
            vec![
                field("Certificate Number", text(&data.safe_environment_certificate, "")),
                field("Completed On", date(&data.safe_environment_completed_on)),
            ],
        )),
        FormType::Clergy => third.push(section(
            "Clergy Faculties",
            vec![
                field("Diocese", text(&data.diocese, "")),
                field("Statement of Good Standing", text(&data.faculties_statement, "")),
            ],
        )),
        FormType::Minor | FormType::Adult => {}
    }

    let consent = if data.photo_release { "Yes" } else { "No" };
    let signer = if layout == FormLayout::Minor {
        "Parent / Guardian Signature"
    } else {
        "Signature"
    };
    third.push(section(
        "Release and Signature",
        vec![
            field("Photo Release", consent.to_string()),
            field(signer, text(&data.signature_name, "")),
            field("Date Signed", date(&data.signed_on)),
        ],
    ));

    let pages = [first, second, third]
        .into_iter()
        .enumerate()
        .map(|(i, sections)| DocumentPage {
            number: i as u32 + 1,
            sections,
        })
        .collect();

    Ok(FormDocument {
        title: layout.title().to_string(),
        layout,
        form_type,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LiabilityFormData {
        LiabilityFormData {
            participant_name: Some("Maria Lopez".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(2009, 4, 12),
            gender: Some("female".to_string()),
            parish_or_group: Some("St. Anne".to_string()),
            emergency_contact_name: Some("Rosa Lopez".to_string()),
            emergency_contact_phone: Some("555-0100".to_string()),
            signature_name: Some("Rosa Lopez".to_string()),
            signed_on: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        }
    }

    fn minor() -> LiabilityFormData {
        LiabilityFormData {
            parent_guardian_name: Some("Rosa Lopez".to_string()),
            parent_guardian_phone: Some("555-0100".to_string()),
            ..base()
        }
    }

    #[test]
    fn test_layout_mapping() {
        assert_eq!(FormLayout::from(FormType::Minor), FormLayout::Minor);
        assert_eq!(FormLayout::from(FormType::Adult), FormLayout::AdultOrChaperone);
        assert_eq!(FormLayout::from(FormType::Chaperone), FormLayout::AdultOrChaperone);
        assert_eq!(FormLayout::from(FormType::Clergy), FormLayout::Clergy);
    }

    #[test]
    fn test_minor_requires_guardian() {
        assert_eq!(
            validate(FormType::Minor, &base()),
            Err(FormError::MissingField("parentGuardianName"))
        );
        assert!(validate(FormType::Minor, &minor()).is_ok());
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut data = base();
        data.emergency_contact_phone = Some("   ".to_string());
        assert_eq!(
            validate(FormType::Adult, &data),
            Err(FormError::MissingField("emergencyContactPhone"))
        );
    }

    #[test]
    fn test_chaperone_requires_certificate() {
        let mut data = base();
        assert_eq!(
            validate(FormType::Chaperone, &data),
            Err(FormError::MissingField("safeEnvironmentCertificate"))
        );
        data.safe_environment_certificate = Some("VIRTUS-1234".to_string());
        assert_eq!(
            validate(FormType::Chaperone, &data),
            Err(FormError::MissingField("safeEnvironmentCompletedOn"))
        );
        data.safe_environment_completed_on = NaiveDate::from_ymd_opt(2023, 9, 1);
        assert!(validate(FormType::Chaperone, &data).is_ok());
    }

    #[test]
    fn test_safe_environment_block_only_for_chaperone() {
        let mut data = base();
        data.safe_environment_certificate = Some("VIRTUS-1234".to_string());
        data.safe_environment_completed_on = NaiveDate::from_ymd_opt(2023, 9, 1);

        let chaperone = build_document(FormType::Chaperone, &data).unwrap();
        assert!(chaperone.section("Safe Environment Certification").is_some());

        let adult = build_document(FormType::Adult, &data).unwrap();
        assert_eq!(adult.layout, FormLayout::AdultOrChaperone);
        assert!(adult.section("Safe Environment Certification").is_none());
        assert!(adult.section("Parent / Guardian").is_none());
    }

    #[test]
    fn test_minor_document_has_guardian_block() {
        let doc = build_document(FormType::Minor, &minor()).unwrap();
        assert_eq!(doc.pages.len(), 3);
        assert!(doc.section("Parent / Guardian").is_some());
        assert!(doc.section("Clergy Faculties").is_none());
    }

    #[test]
    fn test_clergy_document() {
        let mut data = base();
        data.diocese = Some("Diocese of Springfield".to_string());
        data.faculties_statement = Some("In good standing".to_string());
        let doc = build_document(FormType::Clergy, &data).unwrap();
        assert_eq!(doc.title, "Clergy Liability Release");
        let faculties = doc.section("Clergy Faculties").unwrap();
        assert_eq!(faculties.fields[0].value, "Diocese of Springfield");
    }

    #[test]
    fn test_optional_medical_fields_default_to_none() {
        let doc = build_document(FormType::Adult, &base()).unwrap();
        let medical = doc.section("Medical Information").unwrap();
        assert!(medical.fields.iter().all(|f| f.value == "None"));
    }

    #[test]
    fn test_camel_case_payload() {
        let json = serde_json::json!({
            "participantName": "Maria Lopez",
            "dateOfBirth": "2009-04-12",
            "photoRelease": true
        });
        let data: LiabilityFormData = serde_json::from_value(json).unwrap();
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(2009, 4, 12));
        assert!(data.photo_release);
        assert!(data.allergies.is_none());
    }
}
