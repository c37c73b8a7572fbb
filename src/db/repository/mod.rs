//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`, one sub-module per table.
//! Inserts that reference other rows check them first so callers get a
//! `NotFound` naming the missing entity instead of a bare FK failure.

mod account;
mod appointment;
mod doctor;
mod invoice;
mod medical_record;
mod patient;
mod prescription;
mod service;

pub use account::*;
pub use appointment::*;
pub use doctor::*;
pub use invoice::*;
pub use medical_record::*;
pub use patient::*;
pub use prescription::*;
pub use service::*;

/// True when a statement failed on a UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::DatabaseError;
    use crate::models::*;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn new_account(username: &str, role: Role) -> NewAccount {
        NewAccount {
            username: username.into(),
            password_hash: "pbkdf2-sha256$1$c2FsdA$aGFzaA".into(),
            role,
        }
    }

    fn sample_patient() -> NewPatient {
        NewPatient {
            first_name: "Maria".into(),
            last_name: "Santos".into(),
            birthdate: "1990-04-12".into(),
            gender: "female".into(),
            contact_number: "09171234567".into(),
            email: "maria@example.com".into(),
        }
    }

    fn sample_doctor() -> NewDoctor {
        NewDoctor {
            first_name: "Jose".into(),
            last_name: "Rizal".into(),
            specialization: "Ophthalmology".into(),
            contact_number: "09181234567".into(),
            email: "jose@example.com".into(),
        }
    }

    /// One patient, one doctor, one appointment between them.
    fn seed(conn: &Connection) -> (i64, i64, i64) {
        let patient_id = insert_patient(conn, &sample_patient(), None).unwrap();
        let doctor_id = insert_doctor(conn, &sample_doctor(), None).unwrap();
        let appointment_id = insert_appointment(
            conn,
            &NewAppointment {
                patient_id,
                doctor_id,
                appointment_date: "2025-03-01".into(),
                appointment_time: "09:30".into(),
            },
        )
        .unwrap();
        (patient_id, doctor_id, appointment_id)
    }

    #[test]
    fn account_insert_and_lookup_by_username() {
        let conn = test_db();
        let id = insert_account(&conn, &new_account("admin", Role::Admin)).unwrap();

        let account = find_account_by_username(&conn, "admin").unwrap().unwrap();
        assert_eq!(account.account_id, id);
        assert_eq!(account.role, Role::Admin);
        assert!(!account.created_at.is_empty());

        assert!(find_account_by_username(&conn, "nobody").unwrap().is_none());
        assert!(get_account(&conn, id).unwrap().is_some());
    }

    #[test]
    fn duplicate_username_is_reported_and_not_inserted() {
        let conn = test_db();
        insert_account(&conn, &new_account("maria", Role::Patient)).unwrap();
        let err = insert_account(&conn, &new_account("maria", Role::Doctor)).unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateUsername(ref u) if u == "maria"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts WHERE username = 'maria'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn register_patient_links_profile_to_account() {
        let mut conn = test_db();
        let registered = register_account(
            &mut conn,
            &new_account("maria", Role::Patient),
            &NewProfile::Patient(sample_patient()),
        )
        .unwrap();

        let patient_id = registered.profile_id.unwrap();
        let patient = get_patient(&conn, patient_id).unwrap().unwrap();
        assert_eq!(patient.account_id, Some(registered.account_id));
        assert_eq!(patient.email, "maria@example.com");

        let account = get_account(&conn, registered.account_id).unwrap().unwrap();
        assert_eq!(find_profile_id(&conn, &account).unwrap(), Some(patient_id));
    }

    #[test]
    fn register_doctor_links_profile_to_account() {
        let mut conn = test_db();
        let registered = register_account(
            &mut conn,
            &new_account("jrizal", Role::Doctor),
            &NewProfile::Doctor(sample_doctor()),
        )
        .unwrap();

        let account = get_account(&conn, registered.account_id).unwrap().unwrap();
        let doctor_id = find_profile_id(&conn, &account).unwrap().unwrap();
        assert_eq!(Some(doctor_id), registered.profile_id);
        assert_eq!(list_doctors(&conn).unwrap().len(), 1);
    }

    #[test]
    fn concurrent_registrations_on_one_file_all_commit() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clinic.db");
        crate::db::open_database(&path).unwrap();

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut conn = crate::db::open_connection(&path).unwrap();
                    register_account(
                        &mut conn,
                        &new_account(&format!("patient{i}"), Role::Patient),
                        &NewProfile::Patient(sample_patient()),
                    )
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap().unwrap();
        }

        let conn = crate::db::open_connection(&path).unwrap();
        assert_eq!(list_patients(&conn).unwrap().len(), 4);
    }

    #[test]
    fn register_rejects_role_profile_mismatch() {
        let mut conn = test_db();
        let err = register_account(
            &mut conn,
            &new_account("maria", Role::Doctor),
            &NewProfile::Patient(sample_patient()),
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
        assert!(!username_exists(&conn, "maria").unwrap());
        assert!(list_patients(&conn).unwrap().is_empty());
    }

    #[test]
    fn register_duplicate_leaves_no_orphan_profile() {
        let mut conn = test_db();
        register_account(
            &mut conn,
            &new_account("maria", Role::Patient),
            &NewProfile::Patient(sample_patient()),
        )
        .unwrap();
        let err = register_account(
            &mut conn,
            &new_account("maria", Role::Patient),
            &NewProfile::Patient(sample_patient()),
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateUsername(_)));
        assert_eq!(list_patients(&conn).unwrap().len(), 1);
    }

    #[test]
    fn admin_account_has_no_profile() {
        let mut conn = test_db();
        let registered =
            register_account(&mut conn, &new_account("root", Role::Admin), &NewProfile::None)
                .unwrap();
        assert!(registered.profile_id.is_none());
        let account = get_account(&conn, registered.account_id).unwrap().unwrap();
        assert_eq!(find_profile_id(&conn, &account).unwrap(), None);
    }

    #[test]
    fn appointment_requires_existing_patient_and_doctor() {
        let conn = test_db();
        let doctor_id = insert_doctor(&conn, &sample_doctor(), None).unwrap();
        let err = insert_appointment(
            &conn,
            &NewAppointment {
                patient_id: 999,
                doctor_id,
                appointment_date: "2025-03-01".into(),
                appointment_time: "09:30".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound { ref entity_type, .. } if entity_type == "patient"
        ));
    }

    #[test]
    fn appointments_start_scheduled_and_filter_by_party() {
        let conn = test_db();
        let (patient_id, doctor_id, appointment_id) = seed(&conn);
        let other_doctor = insert_doctor(&conn, &sample_doctor(), None).unwrap();

        let appointment = get_appointment(&conn, appointment_id).unwrap().unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);

        let for_doctor = list_appointments(
            &conn,
            &AppointmentFilter { doctor_id: Some(doctor_id), ..Default::default() },
        )
        .unwrap();
        assert_eq!(for_doctor.len(), 1);
        assert_eq!(for_doctor[0].patient_name, "Maria Santos");
        assert_eq!(for_doctor[0].doctor_name, "Dr. Jose Rizal");

        let for_other = list_appointments(
            &conn,
            &AppointmentFilter { doctor_id: Some(other_doctor), ..Default::default() },
        )
        .unwrap();
        assert!(for_other.is_empty());

        let for_patient = list_appointments(
            &conn,
            &AppointmentFilter { patient_id: Some(patient_id), ..Default::default() },
        )
        .unwrap();
        assert_eq!(for_patient.len(), 1);

        assert_eq!(
            count_appointments_by_status(&conn).unwrap(),
            vec![(AppointmentStatus::Scheduled, 1)]
        );
    }

    #[test]
    fn records_carry_their_prescriptions() {
        let conn = test_db();
        let (patient_id, doctor_id, _) = seed(&conn);
        let record_id = insert_medical_record(
            &conn,
            &NewMedicalRecord {
                patient_id,
                doctor_id,
                visit_date: "2025-03-01".into(),
                diagnosis: "Conjunctivitis".into(),
                notes: "Left eye".into(),
            },
        )
        .unwrap();
        insert_prescription(
            &conn,
            &NewPrescription {
                record_id,
                medication_name: "Tobramycin".into(),
                dosage: "1 drop".into(),
                instructions: "Every 4 hours".into(),
            },
        )
        .unwrap();

        let records = list_records(
            &conn,
            &RecordFilter { patient_id: Some(patient_id), ..Default::default() },
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.diagnosis, "Conjunctivitis");
        assert_eq!(records[0].prescriptions.len(), 1);
        assert_eq!(records[0].prescriptions[0].medication_name, "Tobramycin");
    }

    #[test]
    fn prescription_requires_existing_record() {
        let conn = test_db();
        let err = insert_prescription(
            &conn,
            &NewPrescription {
                record_id: 42,
                medication_name: "Paracetamol".into(),
                dosage: "500mg".into(),
                instructions: "As needed".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn invoice_blank_amount_defaults_to_service_fee() {
        let conn = test_db();
        let (patient_id, _, appointment_id) = seed(&conn);
        let service_id = insert_service(
            &conn,
            &NewService {
                name: "Consultation".into(),
                description: "General check-up".into(),
                fee: "750.00".into(),
            },
        )
        .unwrap();

        insert_invoice(
            &conn,
            &NewInvoice {
                appointment_id,
                service_id,
                amount: "  ".into(),
                payment_status: PaymentStatus::Unpaid,
            },
        )
        .unwrap();
        insert_invoice(
            &conn,
            &NewInvoice {
                appointment_id,
                service_id,
                amount: "500.00".into(),
                payment_status: PaymentStatus::Paid,
            },
        )
        .unwrap();

        let filter = InvoiceFilter {
            patient_id: Some(patient_id),
        };
        let invoices = list_invoices(&conn, &filter).unwrap();
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].invoice.amount, "750.00");
        assert_eq!(invoices[0].service_name, "Consultation");
        assert_eq!(invoices[1].invoice.payment_status, PaymentStatus::Paid);

        let counts = count_invoices_by_status(&conn).unwrap();
        assert_eq!(counts, vec![(PaymentStatus::Paid, 1), (PaymentStatus::Unpaid, 1)]);
    }

    #[test]
    fn invoice_requires_existing_service() {
        let conn = test_db();
        let (_, _, appointment_id) = seed(&conn);
        let err = insert_invoice(
            &conn,
            &NewInvoice {
                appointment_id,
                service_id: 77,
                amount: String::new(),
                payment_status: PaymentStatus::Unpaid,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::NotFound { ref entity_type, .. } if entity_type == "service"
        ));
    }

    #[test]
    fn patients_for_doctor_only_include_their_patients() {
        let conn = test_db();
        let (patient_id, doctor_id, _) = seed(&conn);
        insert_patient(&conn, &sample_patient(), None).unwrap();

        let mine = list_patients_for_doctor(&conn, doctor_id).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].patient_id, patient_id);
        assert_eq!(list_patients(&conn).unwrap().len(), 2);
    }

    #[test]
    fn accounts_counted_per_role() {
        let conn = test_db();
        insert_account(&conn, &new_account("a", Role::Admin)).unwrap();
        insert_account(&conn, &new_account("b", Role::Patient)).unwrap();
        insert_account(&conn, &new_account("c", Role::Patient)).unwrap();
        assert_eq!(
            count_accounts_by_role(&conn).unwrap(),
            vec![(Role::Admin, 1), (Role::Patient, 2)]
        );
    }
}
