// src/trade_form.rs - Trade entry form: draft buffer, validation and submission
use crate::api::TradeApi;
use crate::errors::{SubmitError, ValidationError};
use crate::types::{TradeId, TradeRequest};

pub const DEFAULT_SYMBOL: &str = "BTC/USDT";
pub const DEFAULT_QUANTITY: &str = "0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    Symbol,
    #[default]
    BuyPrice,
    SellPrice,
    StopLoss,
    Quantity,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Symbol,
        FormField::BuyPrice,
        FormField::SellPrice,
        FormField::StopLoss,
        FormField::Quantity,
    ];

    pub fn label(&self) -> &str {
        match self {
            FormField::Symbol => "Symbol",
            FormField::BuyPrice => "Buy Price",
            FormField::SellPrice => "Take Profit",
            FormField::StopLoss => "Stop Loss",
            FormField::Quantity => "Quantity",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Raw text as typed. Nothing here is trusted until `validate`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeFormDraft {
    pub symbol: String,
    pub buy_price: String,
    pub sell_price: String,
    pub stop_loss: String,
    pub quantity: String,
}

impl Default for TradeFormDraft {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            buy_price: String::new(),
            sell_price: String::new(),
            stop_loss: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
        }
    }
}

impl TradeFormDraft {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Symbol => &self.symbol,
            FormField::BuyPrice => &self.buy_price,
            FormField::SellPrice => &self.sell_price,
            FormField::StopLoss => &self.stop_loss,
            FormField::Quantity => &self.quantity,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Symbol => &mut self.symbol,
            FormField::BuyPrice => &mut self.buy_price,
            FormField::SellPrice => &mut self.sell_price,
            FormField::StopLoss => &mut self.stop_loss,
            FormField::Quantity => &mut self.quantity,
        }
    }

    /// Checks run in a fixed order and stop at the first failure.
    ///
    /// Take-profit is not compared with the buy price.
    pub fn validate(&self, user_id: i64) -> Result<TradeRequest, ValidationError> {
        let symbol = self.symbol.trim();
        let buy_price = coerce_number(&self.buy_price);
        let sell_price = coerce_number(&self.sell_price);
        let stop_loss = coerce_number(&self.stop_loss);
        let quantity = coerce_number(&self.quantity);

        let (buy_price, sell_price, stop_loss, quantity) =
            match (buy_price, sell_price, stop_loss, quantity) {
                (Some(b), Some(s), Some(sl), Some(q)) if !symbol.is_empty() => (b, s, sl, q),
                _ => return Err(ValidationError::IncompleteFields),
            };

        if quantity <= 0.0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        if stop_loss >= buy_price {
            return Err(ValidationError::StopLossNotBelowBuy);
        }

        Ok(TradeRequest {
            symbol: symbol.to_string(),
            buy_price,
            sell_price,
            stop_loss,
            quantity,
            user_id,
        })
    }

    /// Keeps symbol and quantity.
    pub fn clear_prices(&mut self) {
        self.buy_price.clear();
        self.sell_price.clear();
        self.stop_loss.clear();
    }
}

/// Blank input reads as 0; unparsable or non-finite input counts as missing.
fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Default)]
pub struct TradeForm {
    pub draft: TradeFormDraft,
    pub focus: FormField,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl TradeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.draft.field_mut(self.focus).push(c);
    }

    pub fn backspace(&mut self) {
        self.draft.field_mut(self.focus).pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Validates and, if the draft is good, makes exactly one create call.
    ///
    /// The outcome is also left in `error`/`success` for the UI. Nothing is
    /// added to the active list here; the next poll brings the new trade in.
    pub async fn submit(
        &mut self,
        api: &dyn TradeApi,
        user_id: i64,
    ) -> Result<TradeId, SubmitError> {
        self.error = None;
        self.success = None;

        let request = match self.draft.validate(user_id) {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Trade form rejected: {}", e);
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        match api.create_trade(&request).await {
            Ok(response) => {
                log::info!(
                    "Trade {} created: {} buy={} tp={} sl={} qty={}",
                    response.trade_id,
                    request.symbol,
                    request.buy_price,
                    request.sell_price,
                    request.stop_loss,
                    request.quantity
                );
                self.success = Some(format!("Trade created (id: {})", response.trade_id));
                self.draft.clear_prices();
                Ok(response.trade_id)
            }
            Err(e) => {
                log::warn!("Trade submission failed: {}", e);
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(symbol: &str, buy: &str, sell: &str, sl: &str, qty: &str) -> TradeFormDraft {
        TradeFormDraft {
            symbol: symbol.to_string(),
            buy_price: buy.to_string(),
            sell_price: sell.to_string(),
            stop_loss: sl.to_string(),
            quantity: qty.to_string(),
        }
    }

    #[test]
    fn test_empty_symbol_rejected() {
        let err = draft("", "100", "110", "90", "1").validate(1).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteFields);
        assert_eq!(err.to_string(), "Please fill all fields with valid numbers.");
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = draft("BTC/USDT", "100", "110", "90", "0").validate(1).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be > 0.");

        let negative = draft("BTC/USDT", "100", "110", "90", "-2").validate(1).unwrap_err();
        assert_eq!(negative, ValidationError::NonPositiveQuantity);
    }

    #[test]
    fn test_stop_loss_equal_to_buy_rejected() {
        let err = draft("BTC/USDT", "100", "110", "100", "1").validate(1).unwrap_err();
        assert_eq!(err.to_string(), "Stop-loss should be below Buy Price.");

        let above = draft("BTC/USDT", "100", "110", "101", "1").validate(1).unwrap_err();
        assert_eq!(above, ValidationError::StopLossNotBelowBuy);
    }

    #[test]
    fn test_valid_draft_builds_payload() {
        let request = draft("BTC/USDT", "100", "110", "90", "1").validate(1).unwrap();
        assert_eq!(
            request,
            TradeRequest {
                symbol: "BTC/USDT".to_string(),
                buy_price: 100.0,
                sell_price: 110.0,
                stop_loss: 90.0,
                quantity: 1.0,
                user_id: 1,
            }
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "symbol": "BTC/USDT", "buy_price": 100.0, "sell_price": 110.0,
                "stop_loss": 90.0, "quantity": 1.0, "user_id": 1
            })
        );
    }

    #[test]
    fn test_unparsable_and_non_finite_numbers() {
        for bad in ["abc", "12abc", "inf", "NaN", "1e400"] {
            let err = draft("BTC/USDT", bad, "110", "90", "1").validate(1).unwrap_err();
            assert_eq!(err, ValidationError::IncompleteFields, "input {:?}", bad);
        }
    }

    #[test]
    fn test_blank_numbers_read_as_zero() {
        // Cleared prices after a successful submit: 0 >= 0 fails the stop-loss rule.
        let err = draft("BTC/USDT", "", "", "", "0.1").validate(1).unwrap_err();
        assert_eq!(err, ValidationError::StopLossNotBelowBuy);

        let err = draft("BTC/USDT", "100", "110", "90", "  ").validate(1).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveQuantity);

        let request = draft("BTC/USDT", "100", "", "", "1").validate(1).unwrap();
        assert_eq!(request.sell_price, 0.0);
        assert_eq!(request.stop_loss, 0.0);
    }

    #[test]
    fn test_incomplete_check_runs_before_quantity_check() {
        let err = draft("BTC/USDT", "x", "110", "90", "0").validate(1).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteFields);
    }

    #[test]
    fn test_take_profit_below_buy_is_allowed() {
        let request = draft("BTC/USDT", "100", "95", "90", "0.5").validate(7).unwrap();
        assert_eq!(request.sell_price, 95.0);
        assert_eq!(request.user_id, 7);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let request = draft(" BTC/USDT ", " 100 ", "110", " 90", "1 ").validate(1).unwrap();
        assert_eq!(request.symbol, "BTC/USDT");
        assert_eq!(request.buy_price, 100.0);
    }

    #[test]
    fn test_clear_prices_keeps_symbol_and_quantity() {
        let mut d = draft("ETH/USDT", "100", "110", "90", "3");
        d.clear_prices();
        assert_eq!(d, draft("ETH/USDT", "", "", "", "3"));
    }

    #[test]
    fn test_editing_focused_field() {
        let mut form = TradeForm::new();
        assert_eq!(form.focus, FormField::BuyPrice);

        for c in "101.5".chars() {
            form.input_char(c);
        }
        form.backspace();
        assert_eq!(form.draft.buy_price, "101.");

        form.focus_previous();
        assert_eq!(form.focus, FormField::Symbol);
        form.focus_previous();
        assert_eq!(form.focus, FormField::Quantity);
        form.focus_next();
        assert_eq!(form.focus, FormField::Symbol);
    }
}
