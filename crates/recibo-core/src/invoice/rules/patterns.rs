//! Field catalog for AFIP-style receipts.
//!
//! Labels tolerate the accent drops OCR commonly produces (`Emision`,
//! `Periodo`, `Razon`).

use super::FieldPattern;
use crate::models::comprobante::Field;

/// Literal copy markers printed on multi-copy receipts.
pub const COPY_MARKERS: &[&str] = &["ORIGINAL", "DUPLICADO", "TRIPLICADO"];

/// Regex fragments for every label that can follow a free-text value.
pub const KNOWN_LABELS: &[&str] = &[
    r"Punto de Venta:",
    r"Comp\.? Nro:",
    r"Fecha de Emisi[oó]n:",
    r"CUIT:",
    r"Apellido y Nombre / Raz[oó]n Social:",
    r"Raz[oó]n Social:",
    r"Domicilio Comercial:",
    r"Domicilio:",
    r"Condici[oó]n frente al IVA:",
    r"Condici[oó]n de [Vv]enta:",
    r"Ingresos Brutos:",
    r"Fecha de Inicio de Actividades:",
    r"Per[ií]odo Facturado Desde:",
    r"Fecha de Vto\. para el pago:",
    r"Subtotal:",
    r"Importe Total:",
    r"Importe Otros Tributos:",
    r"CAE N[°º]:",
    r"Fecha de Vto\. de CAE:",
];

/// The extraction catalog. Entries are independent of each other.
pub const CATALOG: &[FieldPattern] = &[
    FieldPattern::new(Field::PointOfSale, r"Punto de Venta:\s*(\d+)"),
    FieldPattern::new(Field::ReceiptNumber, r"Comp\.? Nro:\s*(\d+)"),
    FieldPattern::new(
        Field::IssueDate,
        r"Fecha de Emisi[oó]n:\s*(\d{2}/\d{2}/\d{4})",
    ),
    FieldPattern::new(Field::TotalAmount, r"Importe Total:\s*\$?\s*([\d.,]+)"),
    FieldPattern::new(
        Field::BilledFrom,
        r"Per[ií]odo Facturado Desde:\s*(\d{2}/\d{2}/\d{4})\s*Hasta:\s*(\d{2}/\d{2}/\d{4})",
    ),
    FieldPattern::new(
        Field::BilledTo,
        r"Per[ií]odo Facturado Desde:\s*(\d{2}/\d{2}/\d{4})\s*Hasta:\s*(\d{2}/\d{2}/\d{4})",
    )
    .group(2),
    FieldPattern::new(Field::IssuerTaxId, r"CUIT:\s*(\d{11})"),
    // Skips the recipient's "Apellido y Nombre / Razón Social:" label, also
    // when OCR wraps the line right after the slash.
    FieldPattern::new(
        Field::IssuerName,
        r"(?s)(?:\A\s*|[^/\s]\s*)Raz[oó]n Social:[ \t]*(.*?)",
    )
    .until_next_label(),
    FieldPattern::new(Field::IssuerAddress, r"(?s)Domicilio Comercial:[ \t]*(.*?)")
        .until_next_label(),
    FieldPattern::new(
        Field::IssuerTaxCategory,
        r"(?s)Condici[oó]n frente al IVA:[ \t]*(.*?)",
    )
    .until_next_label(),
    FieldPattern::new(
        Field::RecipientTaxId,
        r"CUIT:\s*(\d{11})\s*Apellido y Nombre / Raz[oó]n Social:",
    ),
    FieldPattern::new(
        Field::RecipientName,
        r"(?s)Apellido y Nombre / Raz[oó]n Social:[ \t]*(.*?)",
    )
    .until_next_label(),
    FieldPattern::new(
        Field::RecipientAddress,
        r"(?s)Apellido y Nombre / Raz[oó]n Social:.+?Domicilio:[ \t]*(.*?)",
    )
    .until_next_label(),
    FieldPattern::new(
        Field::RecipientTaxCategory,
        r"(?s)Apellido y Nombre / Raz[oó]n Social:.+?Condici[oó]n frente al IVA:[ \t]*(.*?)",
    )
    .until_next_label(),
    FieldPattern::new(Field::Subtotal, r"Subtotal:\s*\$?\s*([\d.,]+)"),
    FieldPattern::new(Field::DiscountPercent, r"Bonif:\s*%\s*(\d+)"),
    FieldPattern::new(Field::DiscountAmount, r"Importe Bonif:\s*\$?\s*([\d.,]+)"),
    FieldPattern::new(
        Field::SubtotalAfterDiscount,
        r"Subtotal c/Bonif\.?:\s*\$?\s*([\d.,]+)",
    ),
    FieldPattern::new(
        Field::OtherTaxesAmount,
        r"Importe Otros Tributos:\s*\$?\s*([\d.,]+)",
    ),
    FieldPattern::new(Field::Profession, r#""(.+? - MP \d+)""#).trimmed(),
    FieldPattern::new(Field::CaeNumber, r"CAE N[°º]:\s*(\d+)"),
    FieldPattern::new(
        Field::CaeExpiryDate,
        r"Fecha de Vto\. de CAE:\s*(\d{2}/\d{2}/\d{4})",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_compiles() {
        for rule in CATALOG {
            assert!(rule.compile().is_ok(), "pattern for {:?} failed", rule.field);
        }
    }

    #[test]
    fn test_catalog_covers_each_field_once() {
        let fields: HashSet<Field> = CATALOG.iter().map(|r| r.field).collect();
        assert_eq!(fields.len(), CATALOG.len());
        for required in Field::REQUIRED {
            assert!(fields.contains(&required));
        }
    }

    #[test]
    fn test_issuer_name_skips_recipient_label() {
        let rule = CATALOG
            .iter()
            .find(|r| r.field == Field::IssuerName)
            .unwrap();
        let regex = rule.compile().unwrap();

        let text = "CUIT: 30712345671 Apellido y Nombre / Razón Social: EMPRESA SA";
        assert_eq!(rule.apply(&regex, text), None);

        let text = "Razón Social: PEREZ JUAN Fecha de Emisión: 05/03/2024";
        assert_eq!(rule.apply(&regex, text), Some("PEREZ JUAN".to_string()));
    }

    #[test]
    fn test_issuer_name_skips_recipient_label_wrapped_after_slash() {
        let rule = CATALOG
            .iter()
            .find(|r| r.field == Field::IssuerName)
            .unwrap();
        let regex = rule.compile().unwrap();

        let text = "Apellido y Nombre /\nRazón Social: EMPRESA SA";
        assert_eq!(rule.apply(&regex, text), None);

        let text = "Apellido y Nombre /\nRazón Social: EMPRESA SA\n\nFACTURA\nRazón Social: PEREZ";
        assert_eq!(rule.apply(&regex, text), Some("PEREZ".to_string()));
    }

    #[test]
    fn test_free_text_rules_accept_empty_value() {
        for rule in CATALOG.iter().filter(|r| r.boundary == crate::invoice::rules::Boundary::NextLabel) {
            assert!(
                rule.pattern.ends_with("(.*?)"),
                "{:?} must allow an empty value",
                rule.field
            );
        }
    }
}
