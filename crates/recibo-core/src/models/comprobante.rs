//! Receipt record (*comprobante*) produced by the pipeline.
//!
//! Field names are English in Rust and serialized with the JSON keys used by
//! the upload API (`punto_venta`, `importe_total`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key of [`Comprobante::unformatted`] reserved for enrichment output.
pub const ENRICHMENT_KEY: &str = "analisis_llm";

/// Structured representation of one receipt/invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comprobante {
    /// Uploaded file name.
    pub filename: String,

    /// Uploaded size in bytes.
    pub size: usize,

    /// Declared content type.
    pub content_type: String,

    /// Acquired text after duplicate-block suppression.
    pub text_content: String,

    /// Trimmed QR payload, if any was recovered.
    pub qr_content: Option<String>,

    /// Ordered trail of acquisition and extraction notes.
    #[serde(rename = "diagnostic_messages")]
    pub diagnostics: Vec<String>,

    /// Whether the minimum field set is present.
    #[serde(rename = "es_comprobante_valido")]
    pub is_valid: bool,

    #[serde(rename = "punto_venta")]
    pub point_of_sale: Option<String>,

    #[serde(rename = "numero_comprobante")]
    pub receipt_number: Option<String>,

    /// Issue date as printed (`dd/mm/yyyy`).
    #[serde(rename = "fecha_emision")]
    pub issue_date: Option<String>,

    /// Total amount, verbatim (no locale parsing).
    #[serde(rename = "importe_total")]
    pub total_amount: Option<String>,

    #[serde(rename = "periodo_facturado_desde")]
    pub billed_from: Option<String>,

    #[serde(rename = "periodo_facturado_hasta")]
    pub billed_to: Option<String>,

    /// Issuer CUIT (11 digits).
    #[serde(rename = "cuit_emisor")]
    pub issuer_tax_id: Option<String>,

    #[serde(rename = "razon_social_emisor")]
    pub issuer_name: Option<String>,

    #[serde(rename = "domicilio_comercial_emisor")]
    pub issuer_address: Option<String>,

    #[serde(rename = "condicion_iva_emisor")]
    pub issuer_tax_category: Option<String>,

    /// Recipient CUIT (11 digits).
    #[serde(rename = "cuit_receptor")]
    pub recipient_tax_id: Option<String>,

    #[serde(rename = "razon_social_receptor")]
    pub recipient_name: Option<String>,

    #[serde(rename = "domicilio_comercial_receptor")]
    pub recipient_address: Option<String>,

    #[serde(rename = "condicion_iva_receptor")]
    pub recipient_tax_category: Option<String>,

    pub subtotal: Option<String>,

    #[serde(rename = "bonificacion_porcentaje")]
    pub discount_percent: Option<String>,

    #[serde(rename = "bonificacion_importe")]
    pub discount_amount: Option<String>,

    #[serde(rename = "subtotal_con_bonificacion")]
    pub subtotal_after_discount: Option<String>,

    #[serde(rename = "importe_otros_tributos")]
    pub other_taxes_amount: Option<String>,

    /// Profession/license string, e.g. `Contador Público - MP 1234`.
    #[serde(rename = "profesion_oficio")]
    pub profession: Option<String>,

    /// Electronic authorization code (CAE).
    #[serde(rename = "cae_numero")]
    pub cae_number: Option<String>,

    #[serde(rename = "cae_fecha_vencimiento")]
    pub cae_expiry_date: Option<String>,

    /// Number of ORIGINAL/DUPLICADO/TRIPLICADO marker lines.
    #[serde(rename = "cantidad_copias")]
    pub copy_count: usize,

    /// Values outside the flat field set, e.g. enrichment output.
    #[serde(rename = "otros_datos_no_formateados")]
    pub unformatted: BTreeMap<String, String>,
}

/// Business fields filled by the extraction catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PointOfSale,
    ReceiptNumber,
    IssueDate,
    TotalAmount,
    BilledFrom,
    BilledTo,
    IssuerTaxId,
    IssuerName,
    IssuerAddress,
    IssuerTaxCategory,
    RecipientTaxId,
    RecipientName,
    RecipientAddress,
    RecipientTaxCategory,
    Subtotal,
    DiscountPercent,
    DiscountAmount,
    SubtotalAfterDiscount,
    OtherTaxesAmount,
    Profession,
    CaeNumber,
    CaeExpiryDate,
}

impl Field {
    /// Fields required for a record to be considered valid.
    pub const REQUIRED: [Field; 6] = [
        Field::PointOfSale,
        Field::ReceiptNumber,
        Field::IssueDate,
        Field::TotalAmount,
        Field::IssuerTaxId,
        Field::IssuerName,
    ];

    /// JSON key of the field in the serialized record.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::PointOfSale => "punto_venta",
            Self::ReceiptNumber => "numero_comprobante",
            Self::IssueDate => "fecha_emision",
            Self::TotalAmount => "importe_total",
            Self::BilledFrom => "periodo_facturado_desde",
            Self::BilledTo => "periodo_facturado_hasta",
            Self::IssuerTaxId => "cuit_emisor",
            Self::IssuerName => "razon_social_emisor",
            Self::IssuerAddress => "domicilio_comercial_emisor",
            Self::IssuerTaxCategory => "condicion_iva_emisor",
            Self::RecipientTaxId => "cuit_receptor",
            Self::RecipientName => "razon_social_receptor",
            Self::RecipientAddress => "domicilio_comercial_receptor",
            Self::RecipientTaxCategory => "condicion_iva_receptor",
            Self::Subtotal => "subtotal",
            Self::DiscountPercent => "bonificacion_porcentaje",
            Self::DiscountAmount => "bonificacion_importe",
            Self::SubtotalAfterDiscount => "subtotal_con_bonificacion",
            Self::OtherTaxesAmount => "importe_otros_tributos",
            Self::Profession => "profesion_oficio",
            Self::CaeNumber => "cae_numero",
            Self::CaeExpiryDate => "cae_fecha_vencimiento",
        }
    }
}

impl Comprobante {
    /// Read a business field.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Overwrite a business field.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Names of required fields that are missing or empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        Field::REQUIRED
            .iter()
            .filter(|f| self.get(**f).is_none_or(|v| v.is_empty()))
            .map(|f| f.json_key())
            .collect()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::PointOfSale => &self.point_of_sale,
            Field::ReceiptNumber => &self.receipt_number,
            Field::IssueDate => &self.issue_date,
            Field::TotalAmount => &self.total_amount,
            Field::BilledFrom => &self.billed_from,
            Field::BilledTo => &self.billed_to,
            Field::IssuerTaxId => &self.issuer_tax_id,
            Field::IssuerName => &self.issuer_name,
            Field::IssuerAddress => &self.issuer_address,
            Field::IssuerTaxCategory => &self.issuer_tax_category,
            Field::RecipientTaxId => &self.recipient_tax_id,
            Field::RecipientName => &self.recipient_name,
            Field::RecipientAddress => &self.recipient_address,
            Field::RecipientTaxCategory => &self.recipient_tax_category,
            Field::Subtotal => &self.subtotal,
            Field::DiscountPercent => &self.discount_percent,
            Field::DiscountAmount => &self.discount_amount,
            Field::SubtotalAfterDiscount => &self.subtotal_after_discount,
            Field::OtherTaxesAmount => &self.other_taxes_amount,
            Field::Profession => &self.profession,
            Field::CaeNumber => &self.cae_number,
            Field::CaeExpiryDate => &self.cae_expiry_date,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::PointOfSale => &mut self.point_of_sale,
            Field::ReceiptNumber => &mut self.receipt_number,
            Field::IssueDate => &mut self.issue_date,
            Field::TotalAmount => &mut self.total_amount,
            Field::BilledFrom => &mut self.billed_from,
            Field::BilledTo => &mut self.billed_to,
            Field::IssuerTaxId => &mut self.issuer_tax_id,
            Field::IssuerName => &mut self.issuer_name,
            Field::IssuerAddress => &mut self.issuer_address,
            Field::IssuerTaxCategory => &mut self.issuer_tax_category,
            Field::RecipientTaxId => &mut self.recipient_tax_id,
            Field::RecipientName => &mut self.recipient_name,
            Field::RecipientAddress => &mut self.recipient_address,
            Field::RecipientTaxCategory => &mut self.recipient_tax_category,
            Field::Subtotal => &mut self.subtotal,
            Field::DiscountPercent => &mut self.discount_percent,
            Field::DiscountAmount => &mut self.discount_amount,
            Field::SubtotalAfterDiscount => &mut self.subtotal_after_discount,
            Field::OtherTaxesAmount => &mut self.other_taxes_amount,
            Field::Profession => &mut self.profession,
            Field::CaeNumber => &mut self.cae_number,
            Field::CaeExpiryDate => &mut self.cae_expiry_date,
        }
    }
}
