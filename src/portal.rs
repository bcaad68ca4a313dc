//! Customer-facing operations: the service catalog, appointment booking and
//! support tickets.

use crate::constants::*;
use crate::error::{PortalError, ValidationError};
use crate::list_view::ListView;
use crate::models::{Appointment, AppointmentPayload, Contact, ContactPayload};
use crate::resource::ResourceAdapter;
use crate::utils::{validate_date, validate_string_length, validate_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicService {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub duration: &'static str,
}

pub const SERVICES: &[ClinicService] = &[
    ClinicService {
        id: 1,
        name: "Wellness Examination",
        description: "Comprehensive health check-up including vital signs, physical examination, and preventive care recommendations.",
        duration: "30 minutes",
    },
    ClinicService {
        id: 2,
        name: "Vaccination",
        description: "Essential immunizations to protect your pet from common diseases.",
        duration: "15 minutes",
    },
    ClinicService {
        id: 3,
        name: "Surgery",
        description: "Professional surgical procedures including spaying/neutering and other operations.",
        duration: "1-2 hours",
    },
    ClinicService {
        id: 4,
        name: "Dental Cleaning",
        description: "Complete dental cleaning, scaling, and oral health assessment.",
        duration: "1 hour",
    },
    ClinicService {
        id: 5,
        name: "Grooming",
        description: "Professional grooming services including bath, trim, and nail care.",
        duration: "1 hour",
    },
];

pub fn find_service(id: u32) -> Option<&'static ClinicService> {
    SERVICES.iter().find(|service| service.id == id)
}

pub fn validate_appointment(payload: &AppointmentPayload) -> Result<(), ValidationError> {
    validate_string_length(&payload.owner_name, "Owner name", MAX_OWNER_NAME_LENGTH)?;
    validate_string_length(
        &payload.owner_contact,
        "Owner contact",
        MAX_OWNER_CONTACT_LENGTH,
    )?;
    validate_date(&payload.date)?;
    validate_time(&payload.time)
}

pub fn validate_ticket(payload: &ContactPayload) -> Result<(), ValidationError> {
    validate_string_length(&payload.subject, "Subject", MAX_SUBJECT_LENGTH)?;
    validate_string_length(&payload.email, "Email", MAX_EMAIL_LENGTH)?;
    if payload.message.trim().is_empty() {
        return Err(ValidationError::Empty("Message"));
    }
    Ok(())
}

/// Books through the appointments list so the new booking shows up without a reload.
pub async fn book_appointment<A>(
    appointments: &mut ListView<Appointment, A>,
    payload: AppointmentPayload,
) -> Result<Appointment, PortalError>
where
    A: ResourceAdapter<Appointment>,
{
    validate_appointment(&payload)?;
    let payload = AppointmentPayload {
        owner_name: payload.owner_name.trim().to_string(),
        owner_contact: payload.owner_contact.trim().to_string(),
        date: payload.date.trim().to_string(),
        time: payload.time.trim().to_string(),
    };
    Ok(appointments.create(&payload).await?)
}

pub async fn submit_ticket<A>(
    tickets: &mut ListView<Contact, A>,
    payload: ContactPayload,
) -> Result<Contact, PortalError>
where
    A: ResourceAdapter<Contact>,
{
    validate_ticket(&payload)?;
    Ok(tickets.create(&payload).await?)
}
