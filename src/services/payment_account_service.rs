use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LockType},
};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::{
    dto::payments::{AccountDetails, AddPaymentAccountRequest, PaymentAccountList},
    entity::{
        PaymentAccounts, PaymentMethods, Users,
        payment_accounts::{ActiveModel as AccountActive, Column as AccountCol, Model as AccountModel},
        payment_methods::Column as MethodCol,
    },
    error::{AppError, AppResult, ensure_max_len},
    middleware::auth::AuthUser,
    models::PaymentAccount,
    response::{ApiResponse, IdResponse, Meta},
    state::AppState,
};

const CREDIT_CARD: &str = "credit_card";
const BANK_TRANSFER: &str = "bank_transfer";

/// Keeps the last four digits of a card or account number.
fn last_four(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
    format!("**** {tail}")
}

fn required(value: Option<&str>, message: &str) -> AppResult<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None => Err(AppError::bad_request(message)),
    }
}

fn optional(value: Option<&str>) -> Value {
    Value::String(value.map(str::trim).unwrap_or_default().to_string())
}

/// Builds the stored details for a payment method code. Numbers are masked
/// before they reach the database.
fn account_info(method_code: &str, details: &AccountDetails) -> AppResult<Value> {
    let info = match method_code {
        CREDIT_CARD => {
            let number = required(details.card_number.as_deref(), "Card number is required")?;
            json!({
                "card_number": last_four(&number),
                "card_holder": optional(details.card_holder.as_deref()),
                "expiry_date": optional(details.expiry_date.as_deref()),
            })
        }
        BANK_TRANSFER => {
            let number = required(details.account_number.as_deref(), "Account number is required")?;
            json!({
                "bank_name": optional(details.bank_name.as_deref()),
                "account_number": last_four(&number),
                "account_holder": optional(details.account_holder.as_deref()),
            })
        }
        _ => Value::Object(Map::new()),
    };
    Ok(info)
}

/// Clears the user's default flag. The user row stays locked until commit so
/// concurrent default changes for one user run one after another.
async fn clear_default(txn: &DatabaseTransaction, user_id: Uuid) -> AppResult<()> {
    Users::find_by_id(user_id)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    PaymentAccounts::update_many()
        .col_expr(AccountCol::IsDefault, Expr::value(false))
        .filter(
            Condition::all()
                .add(AccountCol::UserId.eq(user_id))
                .add(AccountCol::IsDefault.eq(true)),
        )
        .exec(txn)
        .await?;
    Ok(())
}

async fn find_own<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<AccountModel> {
    let account = PaymentAccounts::find()
        .filter(
            Condition::all()
                .add(AccountCol::Id.eq(id))
                .add(AccountCol::UserId.eq(user.user_id)),
        )
        .one(conn)
        .await?;
    match account {
        Some(a) => Ok(a),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_accounts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PaymentAccountList>> {
    let items = PaymentAccounts::find()
        .filter(AccountCol::UserId.eq(user.user_id))
        .order_by_desc(AccountCol::IsDefault)
        .order_by_desc(AccountCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(PaymentAccount::from)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        PaymentAccountList { items },
        Some(Meta::empty()),
    ))
}

/// Saves a payment account for an active method. Marking it default clears
/// the flag on the user's other accounts in the same transaction.
pub async fn add_account(
    state: &AppState,
    user: &AuthUser,
    payload: AddPaymentAccountRequest,
) -> AppResult<ApiResponse<PaymentAccount>> {
    let account_name = payload.account_name.trim();
    if account_name.is_empty() {
        return Err(AppError::bad_request("Account name is required"));
    }
    ensure_max_len("Account name", account_name, 100)?;

    let method = PaymentMethods::find()
        .filter(
            Condition::all()
                .add(MethodCol::Id.eq(payload.payment_method_id))
                .add(MethodCol::IsActive.eq(true)),
        )
        .one(&state.orm)
        .await?;
    let method = match method {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };
    let info = account_info(&method.code, &payload.details)?;

    let txn = state.orm.begin().await?;
    if payload.is_default {
        clear_default(&txn, user.user_id).await?;
    }
    let account = AccountActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        payment_method_id: Set(method.id),
        account_name: Set(account_name.to_string()),
        account_info: Set(info),
        is_default: Set(payload.is_default),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        user_id = %user.user_id,
        account_id = %account.id,
        method = %method.code,
        "payment account added"
    );
    Ok(ApiResponse::item(
        "Payment account added",
        PaymentAccount::from(account),
    ))
}

pub async fn set_default_account(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentAccount>> {
    let txn = state.orm.begin().await?;
    let account = find_own(&txn, user, id).await?;

    clear_default(&txn, user.user_id).await?;
    let mut active: AccountActive = account.into();
    active.is_default = Set(true);
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::item(
        "Default payment account updated",
        PaymentAccount::from(account),
    ))
}

pub async fn delete_account(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<IdResponse>> {
    let account = find_own(&state.orm, user, id).await?;
    account.delete(&state.orm).await?;

    tracing::info!(user_id = %user.user_id, account_id = %id, "payment account deleted");
    Ok(ApiResponse::item("Payment account deleted", IdResponse { id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_reduced_to_last_four_digits() {
        assert_eq!(last_four("4111 1111 1111 1234"), "**** 1234");
        assert_eq!(last_four("12-34"), "**** 1234");
        assert_eq!(last_four("98"), "**** 98");
    }

    #[test]
    fn card_details_are_masked() {
        let details = AccountDetails {
            card_number: Some("4111111111119876".into()),
            card_holder: Some(" Ada Lovelace ".into()),
            expiry_date: Some("12/29".into()),
            ..Default::default()
        };
        let info = account_info(CREDIT_CARD, &details).unwrap();
        assert_eq!(info["card_number"], "**** 9876");
        assert_eq!(info["card_holder"], "Ada Lovelace");
        assert_eq!(info["expiry_date"], "12/29");
        assert!(info.get("bank_name").is_none());
    }

    #[test]
    fn bank_transfer_needs_an_account_number() {
        let err = account_info(BANK_TRANSFER, &AccountDetails::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Account number is required"));
    }

    #[test]
    fn other_methods_store_no_details() {
        let details = AccountDetails {
            card_number: Some("4111".into()),
            ..Default::default()
        };
        assert_eq!(account_info("cod", &details).unwrap(), json!({}));
    }
}
