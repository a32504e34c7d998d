use crate::infra::bootstrap_portal;
use clap::Args;
use invigilator_portal::accounts::{LoginRequest, SignupRequest};
use invigilator_portal::applications::domain::{ApplicationForm, ApplicationStatus};
use invigilator_portal::config::AppConfig;
use invigilator_portal::error::AppError;
use invigilator_portal::mirror::{AdminState, AdminSync, StatusUpdateFlow};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of candidates to sign up and submit (at least 2)
    #[arg(long, default_value_t = 3)]
    pub(crate) candidates: usize,
    /// Print the master sheet as CSV after the review round
    #[arg(long)]
    pub(crate) csv: bool,
}

const DEMO_PASSWORD: &str = "demo-pass";
const CITIES: [&str; 4] = ["Indore", "Bhopal", "Ujjain", "Gwalior"];

fn submitted_form(index: usize) -> ApplicationForm {
    let city = CITIES[index % CITIES.len()];
    ApplicationForm {
        dob: Some("1995-03-14".to_string()),
        phone: Some(format!("98260{:05}", index + 1)),
        address: Some(format!("{} Station Road, {city}", 10 + index)),
        exam_city_preference_1: Some(city.to_string()),
        exam_city_preference_2: Some(CITIES[(index + 1) % CITIES.len()].to_string()),
        aadhaar_no: Some(format!("{:012}", 400_000_000_000u64 + index as u64)),
        photo: Some(format!("https://cdn.example.com/{index}/photo.jpg")),
        signature: Some(format!("https://cdn.example.com/{index}/signature.jpg")),
        penalty_clause_agreement: Some(true),
        covid_declaration_agreement: Some(true),
        son_of: Some("Ramesh".to_string()),
        resident: Some(city.to_string()),
        ..ApplicationForm::default()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let portal = bootstrap_portal(&config)?;
    let count = args.candidates.max(2);

    println!("Invigilator Portal Demo");
    println!("=======================");

    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let email = format!("candidate{}@example.com", index + 1);
        portal.accounts.signup(SignupRequest {
            email: Some(email.clone()),
            password: Some(DEMO_PASSWORD.to_string()),
            profile: ApplicationForm {
                name: Some(format!("Candidate {}", index + 1)),
                ..ApplicationForm::default()
            },
        })?;
        let outcome = portal.accounts.login(LoginRequest {
            email: Some(email),
            password: Some(DEMO_PASSWORD.to_string()),
        })?;
        let claims = portal
            .tokens
            .verify(&outcome.token)
            .map_err(|err| AppError::Bootstrap(err.into()))?;
        let record = portal
            .accounts
            .submit_application(&claims, submitted_form(index))?;
        println!(
            "- {} <{}> submitted, status {}",
            record.profile.name,
            record.profile.email,
            record
                .status
                .map(|status| status.label())
                .unwrap_or("none")
        );
        ids.push(record.id);
    }

    let mut admin = AdminState::default();
    let sync = AdminSync::new(portal.reviews.as_ref());
    sync.refresh(&mut admin);
    println!("\nReview queue: {} complete applications", admin.users.len());

    let flow = StatusUpdateFlow::new(portal.reviews.as_ref());
    for (index, id) in ids.iter().enumerate() {
        let decision = if index % 2 == 0 {
            ApplicationStatus::Approve
        } else {
            ApplicationStatus::Reject
        };
        match flow.run(&mut admin, id, decision) {
            Ok(update) => println!(
                "- {} -> {}{}",
                update.user.profile.name,
                decision.label(),
                if update.master_sheet_row.is_some() {
                    " (added to master sheet)"
                } else {
                    ""
                }
            ),
            Err(err) => println!("- {id} -> {} failed: {err}", decision.label()),
        }
    }

    let summary = portal.reviews.populate_master_sheet()?;
    println!("\nPopulate: {}", summary.message());
    println!("Master sheet rows: {}", admin.master_sheet.len());
    for row in &admin.master_sheet {
        println!(
            "- {} | {} | {} | son of {}",
            row.profile.name, row.profile.phone, row.profile.resident, row.profile.son_of
        );
    }

    if let Some(first) = ids.first() {
        let packet = portal.exports.section_packet(first)?;
        println!(
            "\nAgreement packet {} ({} sections, raster scale {}x)",
            packet.filename,
            packet.sections.len(),
            packet.raster_scale
        );
        for section in &packet.sections {
            let heading = section.headings.first().map(String::as_str).unwrap_or("");
            println!("- {:?} / {}: {heading}", section.kind, section.company.legal_name());
        }
    }

    sync.reset(&mut admin);
    let pending = admin
        .users
        .iter()
        .filter(|user| user.status == Some(ApplicationStatus::Pending))
        .count();
    println!("\nAfter reset: {pending} applications back to pending");

    if args.csv {
        let csv = portal.reviews.master_sheet_csv()?;
        println!("\n{}", String::from_utf8_lossy(&csv));
    }

    Ok(())
}
