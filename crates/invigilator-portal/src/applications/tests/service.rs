use super::common::*;
use crate::applications::completeness::ProjectionField;
use crate::applications::domain::{ApplicationStatus, RecordId};
use crate::applications::repository::{ApplicationRepository, MasterSheetRepository};
use crate::applications::{ProjectionOutcome, ReviewError, ReviewService};
use crate::memory::{MemoryApplications, MemoryMasterSheet};
use chrono::{Duration, Utc};
use std::sync::Arc;

#[test]
fn repeated_approval_projects_exactly_once() {
    let (service, applications, master_sheet) = build_service();
    let id = seed(
        &applications,
        complete_profile("Anjali", "9000000101"),
        Some(ApplicationStatus::Pending),
    );

    let first = service
        .set_status(&id, ApplicationStatus::Approve)
        .expect("first approval");
    assert!(matches!(
        first.projection,
        Some(ProjectionOutcome::Inserted(_))
    ));
    assert_eq!(first.message(), "Anjali approved and added to master sheet!");

    let second = service
        .set_status(&id, ApplicationStatus::Approve)
        .expect("second approval");
    assert_eq!(second.projection, Some(ProjectionOutcome::AlreadyPresent));
    assert_eq!(second.message(), "Anjali already in master sheet, approved!");

    let rows = master_sheet.all().expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, id);
    assert_eq!(rows[0].profile.phone, "9000000101");
    assert_eq!(second.record.status, Some(ApplicationStatus::Approve));
}

#[test]
fn approval_with_missing_identity_fields_creates_no_row() {
    let (service, applications, master_sheet) = build_service();
    let mut profile = complete_profile("Bharat", "9000000102");
    profile.son_of.clear();
    profile.resident.clear();
    let id = seed(&applications, profile, Some(ApplicationStatus::Pending));

    match service.set_status(&id, ApplicationStatus::Approve) {
        Err(ReviewError::IncompleteData(fields)) => {
            assert_eq!(fields, vec![ProjectionField::SonOf, ProjectionField::Resident]);
        }
        other => panic!("expected incomplete data, got {other:?}"),
    }

    assert!(master_sheet.all().expect("rows").is_empty());
    // The status write happened before the projection was refused.
    let stored = applications.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.status, Some(ApplicationStatus::Approve));
}

#[test]
fn projection_write_failure_leaves_application_approved() {
    let applications = Arc::new(MemoryApplications::new());
    let service = ReviewService::new(applications.clone(), Arc::new(ReadOnlyMasterSheet));
    let id = seed(
        &applications,
        complete_profile("Chitra", "9000000103"),
        Some(ApplicationStatus::Pending),
    );

    let result = service.set_status(&id, ApplicationStatus::Approve);
    assert!(matches!(result, Err(ReviewError::Repository(_))));
    let stored = applications.fetch(&id).expect("fetch").expect("present");
    assert_eq!(stored.status, Some(ApplicationStatus::Approve));
}

#[test]
fn rejecting_after_approval_keeps_stale_row() {
    let (service, applications, master_sheet) = build_service();
    let id = seed(
        &applications,
        complete_profile("Deepak", "9000000104"),
        Some(ApplicationStatus::Pending),
    );
    service
        .set_status(&id, ApplicationStatus::Approve)
        .expect("approve");

    let change = service
        .set_status(&id, ApplicationStatus::Reject)
        .expect("reject");

    assert_eq!(change.record.status, Some(ApplicationStatus::Reject));
    assert!(change.projection.is_none());
    assert_eq!(change.message(), "Status updated to reject");
    assert_eq!(master_sheet.all().expect("rows").len(), 1);
}

#[test]
fn reset_touches_everyone_but_returns_only_complete() {
    let (service, applications, _) = build_service();
    let complete = seed(
        &applications,
        complete_profile("Esha", "9000000105"),
        Some(ApplicationStatus::Approve),
    );
    let mut partial = complete_profile("Farid", "9000000106");
    partial.photo.clear();
    let incomplete = seed(&applications, partial, Some(ApplicationStatus::Reject));

    let listed = service.reset_all().expect("reset");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, complete);
    let hidden = applications
        .fetch(&incomplete)
        .expect("fetch")
        .expect("present");
    assert_eq!(hidden.status, Some(ApplicationStatus::Pending));
}

#[test]
fn delete_leaves_master_sheet_row() {
    let (service, applications, master_sheet) = build_service();
    let id = seed(
        &applications,
        complete_profile("Gauri", "9000000107"),
        Some(ApplicationStatus::Pending),
    );
    service
        .set_status(&id, ApplicationStatus::Approve)
        .expect("approve");

    let removed = service.delete_application(&id).expect("delete");

    assert_eq!(removed.id, id);
    assert!(matches!(service.get(&id), Err(ReviewError::NotFound)));
    assert_eq!(master_sheet.all().expect("rows")[0].user_id, id);
    assert!(matches!(
        service.delete_application(&id),
        Err(ReviewError::NotFound)
    ));
}

#[test]
fn listing_is_complete_subset_newest_first() {
    let (service, applications, _) = build_service();
    let older = seed(&applications, complete_profile("Hari", "9000000108"), None);
    let newer = seed(&applications, complete_profile("Isha", "9000000109"), None);
    let mut partial = complete_profile("Jay", "9000000110");
    partial.covid_declaration_agreement = false;
    seed(&applications, partial, None);

    let mut record = applications.fetch(&older).expect("fetch").expect("present");
    record.updated_at = Utc::now() - Duration::days(2);
    applications.update(record).expect("update");

    let ids: Vec<RecordId> = service
        .list_complete()
        .expect("list")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![newer, older]);
}

#[test]
fn populate_requires_approved_users() {
    let (service, applications, _) = build_service();
    seed(
        &applications,
        complete_profile("Kiran", "9000000111"),
        Some(ApplicationStatus::Pending),
    );
    assert!(matches!(
        service.populate_master_sheet(),
        Err(ReviewError::NoApprovedUsers)
    ));
}

#[test]
fn populate_matches_any_identity_field() {
    let applications = Arc::new(MemoryApplications::new());
    let master_sheet = Arc::new(MemoryMasterSheet::new());
    let service = ReviewService::new(applications.clone(), master_sheet.clone());

    let first = seed(
        &applications,
        complete_profile("Lalit", "9000000112"),
        Some(ApplicationStatus::Approve),
    );
    service.populate_master_sheet().expect("first populate");

    // Same phone as an existing row, so it counts as present.
    seed(
        &applications,
        complete_profile("Mansi", "9000000112"),
        Some(ApplicationStatus::Approve),
    );
    let mut incomplete = complete_profile("Nakul", "9000000113");
    incomplete.son_of.clear();
    let skipped = seed(&applications, incomplete, Some(ApplicationStatus::Approve));

    let summary = service.populate_master_sheet().expect("second populate");

    assert!(summary.inserted.is_empty());
    assert_eq!(summary.already_present, 2);
    assert_eq!(summary.skipped, vec![skipped]);
    assert_eq!(master_sheet.all().expect("rows").len(), 1);
    assert_eq!(master_sheet.all().expect("rows")[0].user_id, first);
}

#[test]
fn master_sheet_reads_report_empty_sheet() {
    let (service, applications, _) = build_service();
    assert!(matches!(
        service.master_sheet(),
        Err(ReviewError::EmptyMasterSheet)
    ));
    assert!(matches!(
        service.master_sheet_csv(),
        Err(ReviewError::EmptyMasterSheet)
    ));

    let id = seed(
        &applications,
        complete_profile("Omkar", "9000000114"),
        Some(ApplicationStatus::Pending),
    );
    service
        .set_status(&id, ApplicationStatus::Approve)
        .expect("approve");
    let csv = String::from_utf8(service.master_sheet_csv().expect("csv")).expect("utf8");
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("omkar@example.com"));
}

#[test]
fn repository_failures_propagate() {
    let service = ReviewService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryMasterSheet::new()),
    );
    assert!(matches!(
        service.list_complete(),
        Err(ReviewError::Repository(_))
    ));
    assert!(matches!(
        service.set_status(&RecordId::generate(), ApplicationStatus::Reject),
        Err(ReviewError::Repository(_))
    ));
}

#[test]
fn unknown_ids_and_statuses_are_rejected() {
    assert!(matches!(
        ReviewService::parse_id("64f1-nope"),
        Err(ReviewError::InvalidId(_))
    ));
    assert!(matches!(
        ReviewService::parse_status("accepted"),
        Err(ReviewError::InvalidStatus(_))
    ));

    let (service, _, _) = build_service();
    assert!(matches!(
        service.set_status(&RecordId::generate(), ApplicationStatus::Approve),
        Err(ReviewError::NotFound)
    ));
}
