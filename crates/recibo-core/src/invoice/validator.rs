//! Minimum-field validity check.

use crate::models::comprobante::Comprobante;

/// Whether the record carries every required field with a non-empty value.
///
/// Pure: the caller stores the verdict in [`Comprobante::is_valid`].
pub fn validate(comprobante: &Comprobante) -> bool {
    comprobante.missing_required().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comprobante::Field;
    use pretty_assertions::assert_eq;

    fn six_field_record() -> Comprobante {
        let mut c = Comprobante::default();
        c.set(Field::PointOfSale, Some("0001".to_string()));
        c.set(Field::ReceiptNumber, Some("123".to_string()));
        c.set(Field::IssueDate, Some("01/01/2024".to_string()));
        c.set(Field::TotalAmount, Some("100,00".to_string()));
        c.set(Field::IssuerTaxId, Some("20123456789".to_string()));
        c.set(Field::IssuerName, Some("ACME".to_string()));
        c
    }

    #[test]
    fn test_six_field_record_is_valid() {
        assert!(validate(&six_field_record()));
    }

    #[test]
    fn test_removing_any_required_field_invalidates() {
        for field in Field::REQUIRED {
            let mut record = six_field_record();
            record.set(field, None);

            assert!(!validate(&record), "{:?} should be required", field);
            for other in Field::REQUIRED.iter().filter(|f| **f != field) {
                assert_eq!(record.get(*other), six_field_record().get(*other));
            }
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let mut record = six_field_record();
        record.set(Field::TotalAmount, Some(String::new()));
        assert!(!validate(&record));
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let record = six_field_record();
        let before = record.clone();
        validate(&record);
        assert_eq!(record, before);
    }
}
