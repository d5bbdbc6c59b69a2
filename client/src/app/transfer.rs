//! # Coin Transfer Wizard
//!
//! ```text
//! SelectRecipient -> EnterAmount -> Confirm -> Done
//!        ^               |            |         |
//!        +---- back -----+<--- back --+         |
//!        +------------- back / start_over ------+
//! ```
//!
//! The amount is edited with a keypad and kept as text, so the view shows
//! exactly what was typed.

use shared::{DirectoryUser, TransferResponse};
use tracing::{info, warn};

use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    SelectRecipient,
    EnterAmount,
    Confirm,
    Done,
}

/// Keypad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Dot,
}

#[derive(Debug, Clone)]
pub struct TransferFlow {
    step: TransferStep,
    recipient: Option<DirectoryUser>,
    amount: String,
    error: Option<String>,
    result: Option<TransferResponse>,
}

impl Default for TransferFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferFlow {
    pub fn new() -> Self {
        Self {
            step: TransferStep::SelectRecipient,
            recipient: None,
            amount: String::new(),
            error: None,
            result: None,
        }
    }

    pub fn step(&self) -> TransferStep {
        self.step
    }

    pub fn recipient(&self) -> Option<&DirectoryUser> {
        self.recipient.as_ref()
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Parsed amount, `None` while the text is not a number.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&TransferResponse> {
        self.result.as_ref()
    }

    pub fn select_recipient(&mut self, user: DirectoryUser) {
        self.recipient = Some(user);
        self.error = None;
        self.step = TransferStep::EnterAmount;
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Dot if self.amount.contains('.') => {}
            Key::Dot if self.amount.is_empty() => self.amount.push_str("0."),
            Key::Dot => self.amount.push('.'),
            Key::Digit(d) if d > 9 => {}
            Key::Digit(d) => {
                let digit = char::from(b'0' + d);
                if self.amount == "0" {
                    self.amount = digit.to_string();
                } else {
                    self.amount.push(digit);
                }
            }
        }
    }

    /// Remove the last character; the last one left becomes `"0"`.
    pub fn delete(&mut self) {
        if self.amount.chars().count() > 1 {
            self.amount.pop();
        } else {
            self.amount = "0".to_string();
        }
    }

    /// Fill in the whole balance.
    pub fn send_all(&mut self, balance: Option<f64>) {
        self.amount = balance.map(|b| b.to_string()).unwrap_or_else(|| "0".to_string());
    }

    /// EnterAmount -> Confirm, if the amount is positive and covered.
    pub fn proceed(&mut self, balance: f64) -> Result<()> {
        if self.step != TransferStep::EnterAmount {
            return Err(AppError::State("Not entering an amount".to_string()));
        }
        let amount = match self.amount_value() {
            Some(amount) if amount > 0.0 => amount,
            _ => return Err(self.reject("Amount must be greater than zero")),
        };
        if amount > balance {
            return Err(self.reject("Insufficient balance"));
        }
        self.error = None;
        self.step = TransferStep::Confirm;
        Ok(())
    }

    pub fn back(&mut self) {
        match self.step {
            TransferStep::SelectRecipient => {}
            TransferStep::EnterAmount => self.step = TransferStep::SelectRecipient,
            TransferStep::Confirm => self.step = TransferStep::EnterAmount,
            TransferStep::Done => self.start_over(),
        }
    }

    pub fn start_over(&mut self) {
        *self = Self::new();
    }

    /// Send the confirmed transfer. Success moves to `Done`; failure stays
    /// on `Confirm` with the message.
    pub async fn submit(&mut self, api: &dyn ApiService) -> Result<&TransferResponse> {
        if self.step != TransferStep::Confirm {
            return Err(AppError::State("Transfer not confirmed".to_string()));
        }
        let (to, amount) = match (&self.recipient, self.amount_value()) {
            (Some(recipient), Some(amount)) if amount > 0.0 => (recipient.id.clone(), amount),
            _ => return Err(AppError::State("Recipient and amount required".to_string())),
        };

        self.error = None;
        match api.transfer_coin(to.clone(), amount).await {
            Ok(response) => {
                info!(to = %to, amount, "Transfer sent");
                self.step = TransferStep::Done;
                let response = self.result.insert(response);
                Ok(&*response)
            }
            Err(e) => {
                warn!(to = %to, amount, error = %e, "Transfer failed");
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn reject(&mut self, message: &str) -> AppError {
        self.error = Some(message.to_string());
        AppError::Validation(message.to_string())
    }
}
