/// Narrows appointment listings to one patient and/or one doctor.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentFilter {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecordFilter {
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InvoiceFilter {
    pub patient_id: Option<i64>,
}
