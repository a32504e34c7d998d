//! Agreement packet content merged from an application and the exam configuration.

use chrono::NaiveDate;
use serde::Serialize;

use crate::applications::domain::CandidateProfile;
use crate::exam::domain::ExamConfiguration;

/// Rendered in place of any missing value.
pub const PLACEHOLDER: &str = "__________";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    AppointmentLetter,
    CovidDeclaration,
    Undertaking,
    Payout,
    ConfidentialityAgreement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Company {
    StarParth,
    Netparam,
}

impl Company {
    pub const fn legal_name(self) -> &'static str {
        match self {
            Company::StarParth => "StarParth Technologies Pvt Ltd",
            Company::Netparam => "Netparam Technologies Pvt Ltd",
        }
    }
}

/// Fixed packet order. Undertaking and payout appear once per company.
pub const SECTION_ORDER: [(SectionKind, Company); 7] = [
    (SectionKind::AppointmentLetter, Company::StarParth),
    (SectionKind::CovidDeclaration, Company::StarParth),
    (SectionKind::Undertaking, Company::StarParth),
    (SectionKind::Payout, Company::StarParth),
    (SectionKind::Undertaking, Company::Netparam),
    (SectionKind::Payout, Company::Netparam),
    (SectionKind::ConfidentialityAgreement, Company::Netparam),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

/// Uploaded image shown in a section, by URL. `None` leaves the slot blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSlot {
    pub label: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub kind: SectionKind,
    pub company: Company,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub fields: Vec<LabeledValue>,
    pub assets: Vec<AssetSlot>,
}

fn or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `2026-01-05` becomes `5 January 2026`.
pub fn format_long_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.format("%-d %B %Y").to_string())
        .unwrap_or_else(|_| PLACEHOLDER.to_string())
}

pub fn padded_exam_count(count: u32) -> String {
    format!("{count:02}")
}

fn field(label: &str, value: &str) -> LabeledValue {
    LabeledValue {
        label: label.to_string(),
        value: or_placeholder(value),
    }
}

fn asset(label: &str, url: &str) -> AssetSlot {
    let url = url.trim();
    AssetSlot {
        label: label.to_string(),
        url: (!url.is_empty()).then(|| url.to_string()),
    }
}

fn tick(answer: &str) -> String {
    if answer.trim().eq_ignore_ascii_case("yes") {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}

struct ExamTerms {
    name: String,
    count: String,
    held: String,
    held_year: String,
    start: String,
    end: String,
}

impl ExamTerms {
    fn from(exam: Option<&ExamConfiguration>) -> Self {
        match exam {
            Some(exam) => Self {
                name: or_placeholder(&exam.exam_name),
                count: padded_exam_count(exam.exam_count),
                held: or_placeholder(&exam.held_date),
                held_year: exam
                    .held_date
                    .split_whitespace()
                    .last()
                    .map(str::to_string)
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
                start: format_long_date(&exam.start_date),
                end: format_long_date(&exam.end_date),
            },
            None => Self {
                name: PLACEHOLDER.to_string(),
                count: "___".to_string(),
                held: PLACEHOLDER.to_string(),
                held_year: PLACEHOLDER.to_string(),
                start: PLACEHOLDER.to_string(),
                end: PLACEHOLDER.to_string(),
            },
        }
    }
}

/// Build the seven packet sections in their fixed order.
pub fn build_sections(
    profile: &CandidateProfile,
    exam: Option<&ExamConfiguration>,
) -> Vec<Section> {
    let terms = ExamTerms::from(exam);
    SECTION_ORDER
        .iter()
        .map(|(kind, company)| match kind {
            SectionKind::AppointmentLetter | SectionKind::ConfidentialityAgreement => {
                appointment_letter(*kind, *company, profile, &terms)
            }
            SectionKind::CovidDeclaration => covid_declaration(*company, profile, &terms),
            SectionKind::Undertaking => undertaking(*company, profile, &terms),
            SectionKind::Payout => payout(*company, profile, &terms),
        })
        .collect()
}

fn identity_line(profile: &CandidateProfile, terms: &ExamTerms) -> String {
    format!(
        "I {} S/O {} Resident of {} Aadhaar No. {} is working for the {} Examination held from {} to {}.",
        or_placeholder(&profile.name),
        or_placeholder(&profile.son_of),
        or_placeholder(&profile.resident),
        or_placeholder(&profile.aadhaar_no),
        terms.name,
        terms.start,
        terms.end,
    )
}

fn attendance_line(terms: &ExamTerms) -> String {
    format!(
        "I will be there from {} to {} and this is final confirmation, and I will not refuse in any condition.",
        terms.start, terms.end
    )
}

fn appointment_letter(
    kind: SectionKind,
    company: Company,
    profile: &CandidateProfile,
    terms: &ExamTerms,
) -> Section {
    let legal = company.legal_name();
    let mut headings = vec![
        legal.to_uppercase(),
        "CHIEF INVIGILATOR NON-PARTICIPATION / NO RELATION & CONFIDENTIALITY AGREEMENT".to_string(),
    ];
    if kind == SectionKind::AppointmentLetter {
        headings.push("APPOINTMENT LETTER".to_string());
    }

    let paragraphs = vec![
        format!(
            "I {} S/O {} hereby declare that I am not appearing in the {} Examination, {}/{}, held from {} to {} as a candidate either at the exam centre or have been deputed at any other centre which is involved in the conduct of the exam. If I am absent or leave the examination Centre at any time, in any scenario on the above mentioned dates, or found doing any Suspicious Activity / Malpractice / Unethical Behavior / Professional Misconduct, then Netparam Technologies Pvt Ltd / NETCOM / C-DAC / {} has full authority to take any disciplinary action.",
            or_placeholder(&profile.name),
            or_placeholder(&profile.son_of),
            terms.name,
            terms.count,
            terms.held,
            terms.start,
            terms.end,
            terms.name,
        ),
        format!(
            "As a condition of serving as an Operations Chief Invigilator of {legal}, I understand and agree to accept the responsibility for maintaining and protecting the confidential nature of {legal} and related resources. As a Chief Invigilator, I agree that:"
        ),
        format!("1. Will oversee and carry out the administration of {legal} tests in conformance with the conditions described by {legal}."),
        "2. Will not, directly or indirectly, in any way compromise the security of any tests or their content.".to_string(),
        "3. Only I am responsible for my own behavior, character, or any other work that is beyond my authorization.".to_string(),
        "Required documents: Photo Id Proof (Aadhaar Card / PAN Card), 2 Passport Size Photo.".to_string(),
        format!(
            "Exam city Preference - 1) {} 2) {}",
            or_placeholder(&profile.exam_city_preference_1),
            or_placeholder(&profile.exam_city_preference_2),
        ),
        format!(
            "Previous CDAC Exam Experience - {} | No. of Years {} | Role - {}",
            or_placeholder(&profile.previous_cda_experience),
            or_placeholder(&profile.cda_experience_years),
            or_placeholder(&profile.cda_experience_role),
        ),
        "Note: Exam City preference doesn't guarantee the actual allocation, it's only a probability.".to_string(),
    ];

    Section {
        kind,
        company,
        headings,
        paragraphs,
        fields: vec![
            field("Name", &profile.name),
            field("Email", &profile.email),
            field("DOB", &profile.dob),
            field("Mobile No.", &profile.phone),
            field("Area", &profile.area),
            field("Landmark", &profile.landmark),
            field("Address", &profile.address),
            field("Date", &profile.current_date),
        ],
        assets: vec![
            asset("Signature", &profile.signature),
            asset("Photo", &profile.photo),
            asset("Thumb Impression", &profile.thumbprint),
        ],
    }
}

fn covid_declaration(company: Company, profile: &CandidateProfile, terms: &ExamTerms) -> Section {
    let mut paragraphs = vec![
        "Centre Code: __________ Centre Name: __________".to_string(),
        "City: __________ ATC's / C-DAC Centre's Name: __________".to_string(),
        "1. Do you have any of the following flu-like symptoms:".to_string(),
    ];
    for (label, answer) in [
        ("a. Fever", &profile.fever),
        ("b. Cough", &profile.cough),
        ("c. Breathlessness", &profile.breathlessness),
        ("d. Sore Throat", &profile.sore_throat),
        ("e. Others", &profile.other_symptoms),
    ] {
        paragraphs.push(format!("{label}: {}", tick(answer)));
    }
    if !profile.other_symptoms_details.trim().is_empty() {
        paragraphs.push(format!("Details: {}", profile.other_symptoms_details.trim()));
    }
    paragraphs.push(format!(
        "2. Have you or an immediate family member come in close contact with a confirmed case of the coronavirus in the last 14 days: {}",
        tick(&profile.close_contact)
    ));
    paragraphs.push(
        "I hereby declare that all the information mentioned above is true to the best of my knowledge and will immediately inform the Covid-19 Central/State Govt. authority, if any symptoms arise during or after examination.".to_string(),
    );

    Section {
        kind: SectionKind::CovidDeclaration,
        company,
        headings: vec![
            format!(
                "{} {}/{} ({} to {})",
                terms.name, terms.count, terms.held_year, terms.start, terms.end
            ),
            "Self-Declaration - COVID-19".to_string(),
        ],
        paragraphs,
        fields: vec![
            field("Name", &profile.name),
            field("Id Proof", &profile.aadhaar_no),
            field("Date", &profile.current_date),
            field("Place", &profile.resident),
        ],
        assets: vec![asset("Signature", &profile.signature)],
    }
}

fn undertaking(company: Company, profile: &CandidateProfile, terms: &ExamTerms) -> Section {
    let legal = company.legal_name();
    Section {
        kind: SectionKind::Undertaking,
        company,
        headings: vec!["Undertaking".to_string()],
        paragraphs: vec![
            identity_line(profile, terms),
            attendance_line(terms),
            "I hereby take responsibility for all the hardware items provided to me for the smooth conduct of the examination and will return them undamaged once the examination is over. If any damage occurs, you may charge a penalty equal to the loss.".to_string(),
            "I hereby commit to my behaviour during the examination. If the exam starts more than 5 minutes late in any slot while I am in charge of server handling, I agree to be penalized for this mistake.".to_string(),
            "I am responsible for whatever duties are given at the centre, i.e. SSA-1, SSA-2, and agree to pay any penalty arising from a discrepancy on my side.".to_string(),
            "If I am found guilty of any Suspicious Activity / Malpractice / Unethical Behaviour / Professional Misconduct during the whole examination process, the company has full right to waive off all payments I am eligible for.".to_string(),
            format!("All the documents and information I have submitted to {legal} are correct and genuine. If any of them is found false, I will be wholly responsible and the company is fully authorized to take legal action, and no payout will be given to me."),
            format!("If I back out after this confirmation for any reason, I should be penalized and debarred from functioning as a Chief Invigilator in all future examinations of {legal} or their client."),
        ],
        fields: vec![field("Name", &profile.name), field("Mobile No", &profile.phone)],
        assets: vec![
            asset("Signature", &profile.signature),
            asset("Thumb", &profile.thumbprint),
        ],
    }
}

fn payout(company: Company, profile: &CandidateProfile, terms: &ExamTerms) -> Section {
    let legal = company.legal_name();
    Section {
        kind: SectionKind::Payout,
        company,
        headings: vec!["Payout".to_string()],
        paragraphs: vec![
            identity_line(profile, terms),
            attendance_line(terms),
            format!("I agree to work as a Chief Invigilator on behalf of {legal} on the payout of Rs. ___/Day as remuneration for the number of days I am deployed at the centre according to allocation."),
            "Cancelled cheque / Passbook copy should be attached for reference.".to_string(),
            format!("Note: Payment will be given for the above duty and attendance from {legal} in the above-mentioned account through IMPS/NEFT or through CASH."),
            format!("I am interested to join a Certification Program i.e., Basic Certificate Course in Online Exam Management System for the duration of 80 Hours, and authorize {legal} to debit a sum of Rs. ___ from the total payout of {}.", terms.name),
        ],
        fields: vec![
            field("Account Holder Name", &profile.account_holder_name),
            field("Bank Name", &profile.bank_name),
            field("IFSC", &profile.ifsc),
            field("Branch", &profile.branch),
            field("Bank Account No.", &profile.bank_account_no),
            field("Date", &profile.current_date),
            field("Place", &profile.resident),
        ],
        assets: vec![asset("Signature", &profile.signature)],
    }
}
