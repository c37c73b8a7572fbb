//! HTML rendering: self-contained pages built with `format!`.
//!
//! Every value that came from a form or the database passes through
//! `escape` before it is interpolated.

use axum::http::StatusCode;

use crate::config::APP_NAME;
use crate::models::{
    AppointmentStatus, AppointmentView, Doctor, InvoiceView, Patient, PaymentStatus, RecordView,
    Role, Service,
};
use crate::session::SessionContext;

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
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

// ═══════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════

fn nav_links(session: Option<&SessionContext>) -> String {
    let links: &[(&str, &str)] = match session.map(|s| s.role) {
        None => &[("/", "Login"), ("/register", "Register")],
        Some(Role::Admin) => &[
            ("/admin/dashboard", "Dashboard"),
            ("/doctors", "Doctors"),
            ("/patients", "Patients"),
            ("/appointments", "Appointments"),
            ("/services", "Services"),
            ("/reports", "Reports"),
            ("/settings", "Settings"),
        ],
        Some(Role::Doctor) => &[
            ("/doctor/dashboard", "Dashboard"),
            ("/patients", "Patients"),
            ("/appointments", "Appointments"),
            ("/settings", "Settings"),
        ],
        Some(Role::Patient) => &[
            ("/patient/dashboard", "Dashboard"),
            ("/appointments", "Appointments"),
            ("/settings", "Settings"),
        ],
    };

    let mut nav: String = links
        .iter()
        .map(|(href, label)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(session) = session {
        nav.push_str(&format!(
            r#" <span class="who">{} ({})</span> <a href="/logout">Logout</a>"#,
            escape(&session.username),
            session.role
        ));
    }
    nav
}

/// Wrap page content in the shared document shell.
pub fn layout(title: &str, session: Option<&SessionContext>, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {app}</title>
<style>
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#fafaf9;color:#1c1917}}
nav{{background:#0f766e;padding:12px 24px}}
nav a,nav .who{{color:#fff;margin-right:12px;text-decoration:none}}
main{{max-width:960px;margin:0 auto;padding:24px}}
table{{border-collapse:collapse;width:100%;margin-bottom:24px}}
th,td{{border-bottom:1px solid #e7e5e4;padding:6px 8px;text-align:left}}
form.card{{background:#fff;border-radius:12px;box-shadow:0 2px 12px rgba(0,0,0,.06);padding:20px;margin-bottom:24px}}
label{{display:block;margin:8px 0 4px;font-size:.9rem}}
.error{{background:#fef2f2;border:1px solid #fecaca;color:#991b1b;padding:8px 12px;border-radius:8px}}
</style>
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"##,
        title = escape(title),
        app = APP_NAME,
        nav = nav_links(session),
        body = body,
    )
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

fn input(name: &str, label: &str, kind: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input id="{name}" name="{name}" type="{kind}">"#
    )
}

fn select<T>(
    name: &str,
    label: &str,
    items: &[T],
    option: impl Fn(&T) -> (i64, String),
) -> String {
    let options: String = items
        .iter()
        .map(|item| {
            let (id, text) = option(item);
            format!(r#"<option value="{id}">{}</option>"#, escape(&text))
        })
        .collect();
    format!(
        r#"<label for="{name}">{label}</label><select id="{name}" name="{name}">{options}</select>"#
    )
}

fn table(headers: &[&str], rows: Vec<Vec<String>>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("<p>{empty}</p>");
    }
    let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
    let body: String = rows
        .into_iter()
        .map(|cells| {
            let cells: String = cells.iter().map(|c| format!("<td>{}</td>", escape(c))).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!("<table><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table>")
}

fn appointment_rows(appointments: &[AppointmentView]) -> Vec<Vec<String>> {
    appointments
        .iter()
        .map(|a| {
            vec![
                a.appointment.appointment_id.to_string(),
                a.appointment.appointment_date.clone(),
                a.appointment.appointment_time.clone(),
                a.patient_name.clone(),
                a.doctor_name.clone(),
                a.appointment.status.to_string(),
            ]
        })
        .collect()
}

const APPOINTMENT_HEADERS: &[&str] = &["#", "Date", "Time", "Patient", "Doctor", "Status"];

fn appointment_table(appointments: &[AppointmentView]) -> String {
    table(
        APPOINTMENT_HEADERS,
        appointment_rows(appointments),
        "No appointments.",
    )
}

fn record_list(records: &[RecordView]) -> String {
    if records.is_empty() {
        return "<p>No medical records.</p>".to_string();
    }
    records
        .iter()
        .map(|view| {
            let prescriptions = table(
                &["Medication", "Dosage", "Instructions"],
                view.prescriptions
                    .iter()
                    .map(|p| {
                        vec![
                            p.medication_name.clone(),
                            p.dosage.clone(),
                            p.instructions.clone(),
                        ]
                    })
                    .collect(),
                "No prescriptions.",
            );
            format!(
                r#"<section class="record"><h3>Record #{id} · {date}</h3><p>Patient: {patient} · {doctor}</p><p><strong>{diagnosis}</strong></p><p>{notes}</p>{prescriptions}</section>"#,
                id = view.record.record_id,
                date = escape(&view.record.visit_date),
                patient = escape(&view.patient_name),
                doctor = escape(&view.doctor_name),
                diagnosis = escape(&view.record.diagnosis),
                notes = escape(&view.record.notes),
            )
        })
        .collect()
}

fn invoice_table(invoices: &[InvoiceView]) -> String {
    table(
        &["#", "Appointment", "Patient", "Service", "Amount", "Status"],
        invoices
            .iter()
            .map(|i| {
                vec![
                    i.invoice.invoice_id.to_string(),
                    i.appointment_date.clone(),
                    i.patient_name.clone(),
                    i.service_name.clone(),
                    i.invoice.amount.clone(),
                    i.invoice.payment_status.to_string(),
                ]
            })
            .collect(),
        "No invoices.",
    )
}

// ═══════════════════════════════════════════════════════════
// Authentication pages
// ═══════════════════════════════════════════════════════════

/// Login form posting back to `action` (`/` or `/admin/login`).
pub fn login_page(action: &str, heading: &str, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form class="card" method="post" action="{action}">{username}{password}<p><button type="submit">Log in</button></p></form><p><a href="/register">Create an account</a></p>"#,
        error = error_block(error),
        username = input("username", "Username", "text"),
        password = input("password", "Password", "password"),
    );
    layout(heading, None, &body)
}

/// Public sign-up form for patients and doctors.
pub fn register_page(error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form class="card" method="post" action="/register">
<label for="role">Role</label><select id="role" name="role"><option value="patient">Patient</option><option value="doctor">Doctor</option></select>
{first}{last}{email}{phone}{birthdate}{gender}{specialization}{username}{password}
<p><button type="submit">Register</button></p></form>"#,
        error = error_block(error),
        first = input("first_name", "First name", "text"),
        last = input("last_name", "Last name", "text"),
        email = input("email", "Email", "email"),
        phone = input("phone", "Phone", "tel"),
        birthdate = input("birthdate", "Birthdate (patients)", "date"),
        gender = input("gender", "Gender (patients)", "text"),
        specialization = input("specialization", "Specialization (doctors)", "text"),
        username = input("username", "Username", "text"),
        password = input("password", "Password", "password"),
    );
    layout("Register", None, &body)
}

pub fn admin_register_page(session: &SessionContext, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form class="card" method="post" action="/admin/register">{username}{password}<p><button type="submit">Create admin</button></p></form>"#,
        error = error_block(error),
        username = input("username", "Username", "text"),
        password = input("password", "Password", "password"),
    );
    layout("Register Administrator", Some(session), &body)
}

pub fn add_doctor_page(session: &SessionContext, error: Option<&str>) -> String {
    let body = format!(
        r#"{error}<form class="card" method="post" action="/add_doctor">{first}{last}{specialization}{contact}{email}{username}{password}<p><button type="submit">Add doctor</button></p></form>"#,
        error = error_block(error),
        first = input("first_name", "First name", "text"),
        last = input("last_name", "Last name", "text"),
        specialization = input("specialization", "Specialization", "text"),
        contact = input("contact_number", "Contact number", "tel"),
        email = input("email", "Email", "email"),
        username = input("username", "Username", "text"),
        password = input("password", "Password", "password"),
    );
    layout("Add Doctor", Some(session), &body)
}

// ═══════════════════════════════════════════════════════════
// Dashboards
// ═══════════════════════════════════════════════════════════

/// Counts shown on the admin dashboard and reports page.
#[derive(Debug, Clone, Default)]
pub struct ClinicSummary {
    pub accounts_by_role: Vec<(Role, i64)>,
    pub doctors: usize,
    pub patients: usize,
    pub appointments_by_status: Vec<(AppointmentStatus, i64)>,
    pub invoices_by_status: Vec<(PaymentStatus, i64)>,
}

fn count_list<K: std::fmt::Display>(counts: &[(K, i64)]) -> String {
    if counts.is_empty() {
        return "<li>none</li>".to_string();
    }
    counts
        .iter()
        .map(|(key, n)| format!("<li>{}: {n}</li>", escape(&key.to_string())))
        .collect()
}

pub fn admin_dashboard(
    session: &SessionContext,
    summary: &ClinicSummary,
    upcoming: &[AppointmentView],
) -> String {
    let body = format!(
        r#"<p>Welcome, {name}.</p>
<ul><li>Doctors: {doctors}</li><li>Patients: {patients}</li></ul>
<h2>Appointments</h2><ul>{appointments}</ul>
<p><a href="/add_doctor">Add doctor</a> · <a href="/admin/register">Add administrator</a></p>
<h2>Recent appointments</h2>{table}"#,
        name = escape(&session.username),
        doctors = summary.doctors,
        patients = summary.patients,
        appointments = count_list(&summary.appointments_by_status),
        table = appointment_table(upcoming),
    );
    layout("Admin Dashboard", Some(session), &body)
}

pub struct DoctorDashboard<'a> {
    pub doctor: &'a Doctor,
    pub appointments: &'a [AppointmentView],
    pub records: &'a [RecordView],
    pub patients: &'a [Patient],
    pub error: Option<&'a str>,
}

pub fn doctor_dashboard(session: &SessionContext, view: &DoctorDashboard<'_>) -> String {
    let record_form = if view.patients.is_empty() {
        "<p>No patients to record a visit for.</p>".to_string()
    } else {
        format!(
            r#"<form class="card" method="post" action="/records">{patient}{visit}{diagnosis}{notes}<p><button type="submit">Save record</button></p></form>"#,
            patient = select("patient_id", "Patient", view.patients, |p: &Patient| {
                (p.patient_id, p.full_name())
            }),
            visit = input("visit_date", "Visit date", "date"),
            diagnosis = input("diagnosis", "Diagnosis", "text"),
            notes = input("notes", "Notes", "text"),
        )
    };

    let prescription_forms: String = view
        .records
        .iter()
        .map(|r| {
            format!(
                r#"<form class="card" method="post" action="/records/{id}/prescriptions"><h3>Prescribe for record #{id}</h3>{name}{dosage}{instructions}<p><button type="submit">Add prescription</button></p></form>"#,
                id = r.record.record_id,
                name = input("medication_name", "Medication", "text"),
                dosage = input("dosage", "Dosage", "text"),
                instructions = input("instructions", "Instructions", "text"),
            )
        })
        .collect();

    let body = format!(
        r#"{error}<p>{name} · {specialization}</p>
<h2>Appointments</h2>{appointments}
<h2>New medical record</h2>{record_form}
<h2>Medical records</h2>{records}
{prescription_forms}"#,
        error = error_block(view.error),
        name = escape(&view.doctor.full_name()),
        specialization = escape(&view.doctor.specialization),
        appointments = appointment_table(view.appointments),
        records = record_list(view.records),
    );
    layout("Doctor Dashboard", Some(session), &body)
}

pub struct PatientDashboard<'a> {
    pub patient: &'a Patient,
    pub appointments: &'a [AppointmentView],
    pub records: &'a [RecordView],
    pub invoices: &'a [InvoiceView],
    pub doctors: &'a [Doctor],
}

pub fn patient_dashboard(session: &SessionContext, view: &PatientDashboard<'_>) -> String {
    let body = format!(
        r#"<p>Welcome, {name}.</p>
<h2>Book an appointment</h2>{booking}
<h2>Appointments</h2>{appointments}
<h2>Medical records</h2>{records}
<h2>Invoices</h2>{invoices}"#,
        name = escape(&view.patient.full_name()),
        booking = booking_form(None, view.doctors),
        appointments = appointment_table(view.appointments),
        records = record_list(view.records),
        invoices = invoice_table(view.invoices),
    );
    layout("Patient Dashboard", Some(session), &body)
}

fn booking_form(patients: Option<&[Patient]>, doctors: &[Doctor]) -> String {
    if doctors.is_empty() {
        return "<p>No doctors available.</p>".to_string();
    }
    let patient_select = match patients {
        Some(patients) => select("patient_id", "Patient", patients, |p: &Patient| {
            (p.patient_id, p.full_name())
        }),
        None => String::new(),
    };
    format!(
        r#"<form class="card" method="post" action="/appointments">{patient_select}{doctor}{date}{time}<p><button type="submit">Book</button></p></form>"#,
        doctor = select("doctor_id", "Doctor", doctors, |d: &Doctor| {
            (d.doctor_id, format!("{} ({})", d.full_name(), d.specialization))
        }),
        date = input("appointment_date", "Date", "date"),
        time = input("appointment_time", "Time", "time"),
    )
}

// ═══════════════════════════════════════════════════════════
// Listing pages
// ═══════════════════════════════════════════════════════════

pub fn doctors_page(session: &SessionContext, doctors: &[Doctor]) -> String {
    let rows = doctors
        .iter()
        .map(|d| {
            vec![
                d.doctor_id.to_string(),
                d.full_name(),
                d.specialization.clone(),
                d.contact_number.clone(),
                d.email.clone(),
            ]
        })
        .collect();
    let body = format!(
        r#"<p><a href="/add_doctor">Add doctor</a></p>{}"#,
        table(
            &["#", "Name", "Specialization", "Contact", "Email"],
            rows,
            "No doctors registered.",
        )
    );
    layout("Doctors", Some(session), &body)
}

pub fn patients_page(session: &SessionContext, patients: &[Patient]) -> String {
    let rows = patients
        .iter()
        .map(|p| {
            vec![
                p.patient_id.to_string(),
                p.full_name(),
                p.birthdate.clone(),
                p.gender.clone(),
                p.contact_number.clone(),
                p.email.clone(),
            ]
        })
        .collect();
    let body = table(
        &["#", "Name", "Birthdate", "Gender", "Contact", "Email"],
        rows,
        "No patients.",
    );
    layout("Patients", Some(session), &body)
}

/// Options for the booking and billing forms shown to admins.
pub struct AdminForms<'a> {
    pub patients: &'a [Patient],
    pub doctors: &'a [Doctor],
    pub services: &'a [Service],
}

pub struct AppointmentsPage<'a> {
    pub appointments: &'a [AppointmentView],
    /// Doctors a patient may book with; `None` hides the booking form.
    pub patient_booking: Option<&'a [Doctor]>,
    pub admin_forms: Option<AdminForms<'a>>,
    pub error: Option<&'a str>,
}

pub fn appointments_page(session: &SessionContext, page: &AppointmentsPage<'_>) -> String {
    let mut forms = String::new();
    if let Some(doctors) = page.patient_booking {
        forms.push_str("<h2>Book an appointment</h2>");
        forms.push_str(&booking_form(None, doctors));
    }
    if let Some(admin) = &page.admin_forms {
        forms.push_str("<h2>Book an appointment</h2>");
        if admin.patients.is_empty() {
            forms.push_str("<p>No patients registered.</p>");
        } else {
            forms.push_str(&booking_form(Some(admin.patients), admin.doctors));
        }
        forms.push_str("<h2>Bill an appointment</h2>");
        if page.appointments.is_empty() || admin.services.is_empty() {
            forms.push_str("<p>Billing needs at least one appointment and one service.</p>");
        } else {
            forms.push_str(&format!(
                r#"<form class="card" method="post" action="/invoices">{appointment}{service}{amount}<label for="payment_status">Payment status</label><select id="payment_status" name="payment_status"><option value="unpaid">Unpaid</option><option value="paid">Paid</option></select><p><button type="submit">Create invoice</button></p></form>"#,
                appointment = select(
                    "appointment_id",
                    "Appointment",
                    page.appointments,
                    |a: &AppointmentView| {
                        (
                            a.appointment.appointment_id,
                            format!(
                                "#{} {} {} · {}",
                                a.appointment.appointment_id,
                                a.appointment.appointment_date,
                                a.appointment.appointment_time,
                                a.patient_name
                            ),
                        )
                    }
                ),
                service = select("service_id", "Service", admin.services, |s: &Service| {
                    (s.service_id, format!("{} ({})", s.name, s.fee))
                }),
                amount = input("amount", "Amount (blank uses the service fee)", "text"),
            ));
        }
    }

    let body = format!(
        "{error}{forms}<h2>All visible appointments</h2>{table}",
        error = error_block(page.error),
        table = appointment_table(page.appointments),
    );
    layout("Appointments", Some(session), &body)
}

pub fn services_page(
    session: &SessionContext,
    services: &[Service],
    error: Option<&str>,
) -> String {
    let rows = services
        .iter()
        .map(|s| {
            vec![
                s.service_id.to_string(),
                s.name.clone(),
                s.description.clone(),
                s.fee.clone(),
            ]
        })
        .collect();
    let body = format!(
        r#"{error}<form class="card" method="post" action="/services">{name}{description}{fee}<p><button type="submit">Add service</button></p></form>{table}"#,
        error = error_block(error),
        name = input("name", "Name", "text"),
        description = input("description", "Description", "text"),
        fee = input("fee", "Fee", "text"),
        table = table(&["#", "Name", "Description", "Fee"], rows, "No services."),
    );
    layout("Services", Some(session), &body)
}

pub fn reports_page(
    session: &SessionContext,
    summary: &ClinicSummary,
    invoices: &[InvoiceView],
) -> String {
    let body = format!(
        r#"<h2>Accounts</h2><ul>{accounts}</ul>
<h2>Appointments</h2><ul>{appointments}</ul>
<h2>Invoices</h2><ul>{invoice_counts}</ul>{invoices}"#,
        accounts = count_list(&summary.accounts_by_role),
        appointments = count_list(&summary.appointments_by_status),
        invoice_counts = count_list(&summary.invoices_by_status),
        invoices = invoice_table(invoices),
    );
    layout("Reports", Some(session), &body)
}

pub fn settings_page(
    session: &SessionContext,
    member_since: &str,
    session_ttl_secs: u64,
) -> String {
    let body = format!(
        r#"<table><tbody>
<tr><th>Username</th><td>{username}</td></tr>
<tr><th>Role</th><td>{role}</td></tr>
<tr><th>Member since</th><td>{member_since}</td></tr>
<tr><th>Session lifetime</th><td>{hours} h idle</td></tr>
</tbody></table>
<p><a href="/logout">Log out</a></p>"#,
        username = escape(&session.username),
        role = session.role,
        member_since = escape(member_since),
        hours = session_ttl_secs / 3600,
    );
    layout("Settings", Some(session), &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    layout(
        title,
        None,
        &format!(
            r#"<p class="error">{}</p><p><a href="/">Back to login</a></p>"#,
            escape(message)
        ),
    )
}
