//! Built-in service definitions.
//!
//! The supported procedures are fixed at build time. Each entry mirrors one
//! public-administration form: its display name, output template identifier,
//! and required fields in the order they appear on the document.

use once_cell::sync::Lazy;

use super::field::{FieldSchema, FieldSpec};
use super::service::{ServiceContext, ServiceId, ServiceRegistry};

static REGISTRY: Lazy<ServiceRegistry> = Lazy::new(|| {
    ServiceRegistry::new(vec![
        identity_card(),
        passport_renewal(),
        vehicle_registration(),
    ])
});

/// Returns the built-in service registry.
pub fn registry() -> &'static ServiceRegistry {
    &REGISTRY
}

fn identity_card() -> ServiceContext {
    ServiceContext {
        id: ServiceId::new("identity_card"),
        name: "Identity Card Issue (14yo)".to_string(),
        description: "Application for the first Identity Card issuance for minors."
            .to_string(),
        template_file: "template_id.md".to_string(),
        schema: FieldSchema::new(vec![
            FieldSpec::text("LastName", "Family Name"),
            FieldSpec::text("FirstName", "First Name"),
            FieldSpec::numeric_code("CNP", "Personal Numerical Code (CNP)", 13),
            FieldSpec::text("FatherName", "Father's First Name"),
            FieldSpec::text("MotherName", "Mother's First Name"),
            FieldSpec::text("City", "City / Sector"),
            FieldSpec::text("Street", "Street Name"),
            FieldSpec::text("Number", "Street Number"),
        ])
        .expect("identity card schema is valid"),
    }
}

fn passport_renewal() -> ServiceContext {
    ServiceContext {
        id: ServiceId::new("passport_renewal"),
        name: "Passport Renewal Application".to_string(),
        description: "Application to renew an expired electronic passport.".to_string(),
        template_file: "template_passport.md".to_string(),
        schema: FieldSchema::new(vec![
            FieldSpec::text("LastName", "Current Family Name"),
            FieldSpec::text("FirstName", "First Name"),
            FieldSpec::text("PassportNo", "Old Passport Number"),
            FieldSpec::text("ExpiryDate", "Old Expiry Date (DD/MM/YYYY)"),
            FieldSpec::numeric_code("CNP", "Personal Numerical Code", 13),
            FieldSpec::text("Reason", "Reason for Renewal"),
        ])
        .expect("passport renewal schema is valid"),
    }
}

fn vehicle_registration() -> ServiceContext {
    ServiceContext {
        id: ServiceId::new("vehicle_registration"),
        name: "Vehicle Registration Form".to_string(),
        description: "Registering a newly purchased vehicle.".to_string(),
        template_file: "template_vehicle.md".to_string(),
        schema: FieldSchema::new(vec![
            FieldSpec::text("OwnerName", "New Owner Name"),
            FieldSpec::text("VIN", "Chassis Number (VIN)"),
            FieldSpec::text("CarMake", "Car Brand (Make)"),
            FieldSpec::text("CarModel", "Car Model"),
            FieldSpec::text("ProductionYear", "Year of Production"),
            FieldSpec::text("Date", "Purchase Date"),
        ])
        .expect("vehicle registration schema is valid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{FieldFormat, FieldId};

    #[test]
    fn registry_has_three_services() {
        assert_eq!(registry().len(), 3);
    }

    #[test]
    fn identity_card_is_default_service() {
        assert_eq!(
            registry().default_service().unwrap().id,
            ServiceId::new("identity_card")
        );
    }

    #[test]
    fn identity_card_has_eight_fields() {
        let svc = registry().get(&ServiceId::new("identity_card")).unwrap();
        assert_eq!(svc.schema.len(), 8);
    }

    #[test]
    fn cnp_fields_carry_thirteen_digit_rule() {
        for id in ["identity_card", "passport_renewal"] {
            let svc = registry().get(&ServiceId::new(id)).unwrap();
            let cnp = svc.schema.spec_for("CNP").unwrap();
            assert_eq!(cnp.format, FieldFormat::NumericCode { digits: 13 });
        }
    }

    #[test]
    fn vehicle_registration_has_no_cnp() {
        let svc = registry().get(&ServiceId::new("vehicle_registration")).unwrap();
        assert!(!svc.schema.contains(&FieldId::new("CNP")));
        assert_eq!(svc.schema.len(), 6);
    }
}
