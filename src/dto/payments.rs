use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::enums::RefundStatus,
    models::{Order, PaymentAccount, PaymentMethod, PaymentTransaction, Refund},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    pub payment_method_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResult {
    pub order: Order,
    pub transaction: PaymentTransaction,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentMethodList {
    #[schema(value_type = Vec<PaymentMethod>)]
    pub items: Vec<PaymentMethod>,
}

/// Method-specific fields of a saved account. Card fields apply to
/// `credit_card`, bank fields to `bank_transfer`; other methods keep none.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AccountDetails {
    pub card_number: Option<String>,
    pub card_holder: Option<String>,
    pub expiry_date: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPaymentAccountRequest {
    pub payment_method_id: Uuid,
    pub account_name: String,
    #[serde(default)]
    pub details: AccountDetails,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentAccountList {
    #[schema(value_type = Vec<PaymentAccount>)]
    pub items: Vec<PaymentAccount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TransactionList {
    #[schema(value_type = Vec<PaymentTransaction>)]
    pub items: Vec<PaymentTransaction>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefundRequest {
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RefundList {
    #[schema(value_type = Vec<Refund>)]
    pub items: Vec<Refund>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RefundDecision {
    Approve,
    Reject,
}

impl RefundDecision {
    pub fn resulting_status(&self) -> RefundStatus {
        match self {
            RefundDecision::Approve => RefundStatus::Completed,
            RefundDecision::Reject => RefundStatus::Rejected,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRefundRequest {
    pub action: RefundDecision,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundDecisionResult {
    pub refund: Refund,
    pub order: Order,
}
