use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::models::{StockReason, StockVerdict};

pub const ADD_TO_CART_TEXT: &str = "Add to Cart";
pub const UNAVAILABLE_TEXT: &str = "Unavailable";

/// Generated class-name tokens the product page uses on its cart button.
///
/// The suffixes are CSS-module hashes and change whenever the storefront is
/// rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButtonSignature {
    pub add_to_cart_class: String,
    pub secondary_class: String,
    pub disabled_class: String,
}

impl Default for ButtonSignature {
    fn default() -> Self {
        Self {
            add_to_cart_class: "add-to-cart-button--PZmQF".to_string(),
            secondary_class: "btn-secondary--mtUol".to_string(),
            disabled_class: "disabled--vkECP".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Only the first button satisfying the attribute predicates is checked
    /// against the text predicate.
    FirstCandidate,
    /// Any button satisfying every predicate matches.
    AnyButton,
}

/// A declarative predicate over `<button>` elements.
#[derive(Debug, Clone)]
pub struct ButtonRule {
    pub reason: StockReason,
    /// Each token must appear somewhere in the `class` attribute value.
    pub class_tokens: Vec<String>,
    pub button_type: Option<String>,
    /// Exact visible text after trimming surrounding whitespace.
    pub text: Option<String>,
    /// `Some(true)` requires a `disabled` attribute, `Some(false)` forbids it.
    pub disabled: Option<bool>,
    pub mode: MatchMode,
}

impl ButtonRule {
    fn new(reason: StockReason, mode: MatchMode) -> Self {
        Self {
            reason,
            class_tokens: Vec::new(),
            button_type: None,
            text: None,
            disabled: None,
            mode,
        }
    }

    fn with_classes(mut self, tokens: &[&str]) -> Self {
        self.class_tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    fn with_type(mut self, button_type: &str) -> Self {
        self.button_type = Some(button_type.to_string());
        self
    }

    fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    fn attributes_match(&self, button: &ElementRef) -> bool {
        let element = button.value();

        if !self.class_tokens.is_empty() {
            let Some(class) = element.attr("class") else {
                return false;
            };
            if !self.class_tokens.iter().all(|token| class.contains(token.as_str())) {
                return false;
            }
        }

        if let Some(expected) = &self.button_type {
            if element.attr("type") != Some(expected.as_str()) {
                return false;
            }
        }

        match self.disabled {
            Some(required) => element.attr("disabled").is_some() == required,
            None => true,
        }
    }

    fn text_matches(&self, button: &ElementRef) -> bool {
        match &self.text {
            Some(expected) => visible_text(button) == *expected,
            None => true,
        }
    }

    pub fn matches(&self, buttons: &[ElementRef]) -> bool {
        match self.mode {
            MatchMode::FirstCandidate => buttons
                .iter()
                .find(|b| self.attributes_match(b))
                .is_some_and(|b| self.text_matches(b)),
            MatchMode::AnyButton => buttons
                .iter()
                .any(|b| self.attributes_match(b) && self.text_matches(b)),
        }
    }
}

fn visible_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The ordered heuristics for the storefront's cart button. First match wins.
pub fn default_rules(signature: &ButtonSignature) -> Vec<ButtonRule> {
    vec![
        ButtonRule::new(StockReason::InStockPrimary, MatchMode::FirstCandidate)
            .with_classes(&[
                signature.add_to_cart_class.as_str(),
                signature.secondary_class.as_str(),
            ])
            .with_type("button")
            .with_text(ADD_TO_CART_TEXT),
        ButtonRule::new(StockReason::OutOfStockPrimary, MatchMode::AnyButton)
            .with_classes(&[
                signature.add_to_cart_class.as_str(),
                signature.disabled_class.as_str(),
            ])
            .with_disabled(true),
        ButtonRule::new(StockReason::OutOfStockPrimary, MatchMode::AnyButton)
            .with_text(UNAVAILABLE_TEXT)
            .with_disabled(true),
        ButtonRule::new(StockReason::InStockFallback, MatchMode::AnyButton)
            .with_text(ADD_TO_CART_TEXT)
            .with_disabled(false),
    ]
}

pub struct StockClassifier {
    rules: Vec<ButtonRule>,
    button_selector: Selector,
}

impl Default for StockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StockClassifier {
    pub fn new() -> Self {
        Self::with_signature(&ButtonSignature::default())
    }

    pub fn with_signature(signature: &ButtonSignature) -> Self {
        Self::with_rules(default_rules(signature))
    }

    pub fn with_rules(rules: Vec<ButtonRule>) -> Self {
        Self {
            rules,
            button_selector: Selector::parse("button").expect("`button` is a valid selector"),
        }
    }

    pub fn rules(&self) -> &[ButtonRule] {
        &self.rules
    }

    /// Map page markup to a verdict. Markup matching no rule is reported as
    /// not in stock with [`StockReason::Unknown`].
    pub fn classify(&self, html: &str) -> StockVerdict {
        let document = Html::parse_document(html);
        let buttons: Vec<ElementRef> = document.select(&self.button_selector).collect();

        let reason = self
            .rules
            .iter()
            .find(|rule| rule.matches(&buttons))
            .map(|rule| rule.reason)
            .unwrap_or(StockReason::Unknown);

        tracing::debug!(
            buttons = buttons.len(),
            reason = %reason,
            "{}",
            reason.status_line()
        );

        StockVerdict::from_reason(reason)
    }
}
