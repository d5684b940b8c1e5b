use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// pending -> completed | failed | refunded; completed -> refunded
    /// (admin correction). Everything else is rejected.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        match (self, next) {
            (PaymentStatus::Pending, PaymentStatus::Completed)
            | (PaymentStatus::Pending, PaymentStatus::Failed)
            | (PaymentStatus::Pending, PaymentStatus::Refunded)
            | (PaymentStatus::Completed, PaymentStatus::Refunded) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentType {
    Rent,
    Deposit,
    Maintenance,
    Other,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: String,
    pub occupancy_id: String,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub payment_method: String,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewPaymentParams {
    pub occupancy_id: String,
    pub amount: f64,
    pub payment_type: PaymentType,
    pub payment_method: String,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
}

impl Payment {
    pub fn new(params: NewPaymentParams) -> Result<Self, AppError> {
        if params.amount < 0.0 || !params.amount.is_finite() {
            return Err(AppError::Validation("Amount must not be negative".into()));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            occupancy_id: params.occupancy_id,
            amount: params.amount,
            payment_type: params.payment_type,
            payment_method: params.payment_method,
            status: PaymentStatus::Pending,
            due_date: params.due_date,
            payment_date: None,
            transaction_id: None,
            notes: params.notes,
            created_at: Utc::now(),
        })
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }

    /// Applies a staff-driven status transition. Completing a payment
    /// requires a transaction id and stamps `payment_date`; once set,
    /// those fields are never cleared by later transitions.
    pub fn transition(
        &mut self,
        next: PaymentStatus,
        transaction_id: Option<String>,
        today: NaiveDate,
    ) -> Result<(), AppError> {
        if !self.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Invalid payment status transition: {:?} -> {:?}",
                self.status, next
            )));
        }

        if next == PaymentStatus::Completed {
            let txn = transaction_id
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| AppError::Validation("transaction_id is required to complete a payment".into()))?;
            self.payment_date = Some(today);
            self.transaction_id = Some(txn);
        }

        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(due: NaiveDate) -> Payment {
        Payment::new(NewPaymentParams {
            occupancy_id: "occ-1".into(),
            amount: 500.0,
            payment_type: PaymentType::Rent,
            payment_method: "Cash".into(),
            due_date: due,
            notes: None,
        })
        .unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn pending_past_due_is_overdue_until_completed() {
        let mut p = payment(d("2024-01-01"));
        let today = d("2024-02-01");
        assert!(p.is_overdue(today));

        p.transition(PaymentStatus::Completed, Some("TXN1".into()), today).unwrap();
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.payment_date, Some(today));
        assert!(!p.is_overdue(today));
    }

    #[test]
    fn completing_requires_transaction_id() {
        let mut p = payment(d("2024-01-01"));
        let err = p.transition(PaymentStatus::Completed, None, d("2024-02-01"));
        assert!(err.is_err());
        assert_eq!(p.status, PaymentStatus::Pending);
    }

    #[test]
    fn completed_cannot_return_to_pending() {
        let mut p = payment(d("2024-01-01"));
        p.transition(PaymentStatus::Completed, Some("TXN1".into()), d("2024-02-01")).unwrap();
        assert!(p.transition(PaymentStatus::Pending, None, d("2024-02-01")).is_err());
        assert!(p.status.can_transition_to(PaymentStatus::Refunded));
    }

    #[test]
    fn failed_leaves_payment_date_untouched() {
        let mut p = payment(d("2024-01-01"));
        p.transition(PaymentStatus::Failed, None, d("2024-02-01")).unwrap();
        assert_eq!(p.payment_date, None);
        assert_eq!(p.transaction_id, None);
    }

    #[test]
    fn rejects_negative_amount() {
        assert!(Payment::new(NewPaymentParams {
            occupancy_id: "occ-1".into(),
            amount: -5.0,
            payment_type: PaymentType::Rent,
            payment_method: "Cash".into(),
            due_date: d("2024-01-01"),
            notes: None,
        })
        .is_err());
    }
}
