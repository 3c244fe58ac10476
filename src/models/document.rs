// src/models/document.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{lifecycle::Lifecycle, validation::non_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BarangayClearance,
    CertificateOfResidency,
    CertificateOfIndigency,
    BusinessClearance,
    BarangayId,
    CertificateOfGoodMoral,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::BarangayClearance => "barangay_clearance",
            DocumentType::CertificateOfResidency => "certificate_of_residency",
            DocumentType::CertificateOfIndigency => "certificate_of_indigency",
            DocumentType::BusinessClearance => "business_clearance",
            DocumentType::BarangayId => "barangay_id",
            DocumentType::CertificateOfGoodMoral => "certificate_of_good_moral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Ready,
    Released,
    Rejected,
    Cancelled,
}

impl Lifecycle for DocumentStatus {
    const RETIRED: Self = DocumentStatus::Cancelled;
    const HIDDEN: &'static [Self] = &[DocumentStatus::Cancelled];

    fn label(self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Released => "released",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    fn can_transition_to(self, next: Self) -> bool {
        use DocumentStatus::*;
        match (self, next) {
            (Pending, Processing | Rejected | Cancelled) => true,
            (Processing, Ready | Rejected | Cancelled) => true,
            (Ready, Released | Cancelled) => true,
            (Rejected, Cancelled) => true,
            _ => false,
        }
    }
}

/// Certificate request; `control_number` is derived from the document type.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Document {
    pub id: i64,
    pub barangay_id: i64,
    pub resident_id: i64,
    pub document_type: DocumentType,
    #[schema(example = "BAR-2024-00001")]
    pub control_number: String,
    #[schema(example = "Employment requirement")]
    pub purpose: String,
    #[schema(value_type = f64, example = 50.0)]
    pub fee: Decimal,
    pub remarks: Option<String>,
    pub status: DocumentStatus,
    pub issued_by: Option<i64>,
    pub released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentPayload {
    pub barangay_id: Option<i64>,
    pub resident_id: i64,
    pub document_type: DocumentType,
    #[validate(length(min = 1, message = "Purpose is required"))]
    pub purpose: String,
    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = f64)]
    pub fee: Decimal,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentPayload {
    #[validate(length(min = 1, message = "Purpose cannot be empty"))]
    pub purpose: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<f64>)]
    pub fee: Option<Decimal>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentStatusPayload {
    pub status: DocumentStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DocumentQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches the control number.
    pub search: Option<String>,
    pub resident_id: Option<i64>,
    pub document_type: Option<DocumentType>,
    pub status: Option<DocumentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::sequence::document_prefix;

    #[test]
    fn every_type_yields_a_three_letter_prefix() {
        for ty in [
            DocumentType::BarangayClearance,
            DocumentType::CertificateOfResidency,
            DocumentType::CertificateOfIndigency,
            DocumentType::BusinessClearance,
            DocumentType::BarangayId,
            DocumentType::CertificateOfGoodMoral,
        ] {
            assert_eq!(document_prefix(ty.as_str()).len(), 3);
        }
        assert_eq!(document_prefix(DocumentType::BusinessClearance.as_str()), "BUS");
    }

    #[test]
    fn as_str_matches_wire_name() {
        let json = serde_json::to_value(DocumentType::CertificateOfIndigency).unwrap();
        assert_eq!(json, DocumentType::CertificateOfIndigency.as_str());
    }

    #[test]
    fn released_documents_are_final() {
        assert!(!DocumentStatus::Released.can_transition_to(DocumentStatus::Cancelled));
        assert!(DocumentStatus::Ready.can_transition_to(DocumentStatus::Released));
        assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Released));
        assert!(!DocumentStatus::Pending.can_transition_to(DocumentStatus::Ready));
        assert!(DocumentStatus::Rejected.can_transition_to(DocumentStatus::Cancelled));
    }
}
