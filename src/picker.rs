//! Searchable currency picker state
//!
//! Holds the query typed into the picker overlay and the highlighted row of
//! the filtered currency list.

use crate::data::Currency;

/// Which side of the conversion the picker is choosing for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSide {
    Base,
    Counter,
}

impl PickerSide {
    /// Title shown on the picker overlay
    pub fn title(&self) -> &'static str {
        match self {
            PickerSide::Base => "From",
            PickerSide::Counter => "To",
        }
    }
}

/// Returns the currencies matching `query`, in list order
pub fn filter_currencies<'a>(currencies: &'a [Currency], query: &str) -> Vec<&'a Currency> {
    currencies.iter().filter(|c| c.matches(query)).collect()
}

/// Type-to-filter selector over the currency list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPicker {
    /// Side being picked for
    pub side: PickerSide,
    /// Current search text
    pub query: String,
    /// Index into the filtered list
    pub selected: usize,
}

impl CurrencyPicker {
    /// Opens a picker with the current selection highlighted
    pub fn open(side: PickerSide, currencies: &[Currency], current: Option<&Currency>) -> Self {
        let selected = current
            .and_then(|cur| currencies.iter().position(|c| c == cur))
            .unwrap_or(0);
        Self {
            side,
            query: String::new(),
            selected,
        }
    }

    /// Appends a character to the query and resets the highlight
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    /// Removes the last query character and resets the highlight
    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    /// Moves the highlight up, wrapping to bottom if at top
    pub fn move_up(&mut self, currencies: &[Currency]) {
        let count = filter_currencies(currencies, &self.query).len();
        if count == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = count - 1;
        } else {
            self.selected = self.selected.min(count) - 1;
        }
    }

    /// Moves the highlight down, wrapping to top if at bottom
    pub fn move_down(&mut self, currencies: &[Currency]) {
        let count = filter_currencies(currencies, &self.query).len();
        if count == 0 {
            return;
        }
        self.selected = (self.selected + 1) % count;
    }

    /// The highlighted currency, if the filter matches anything
    pub fn selection<'a>(&self, currencies: &'a [Currency]) -> Option<&'a Currency> {
        filter_currencies(currencies, &self.query)
            .get(self.selected)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currencies() -> Vec<Currency> {
        vec![
            Currency::new("AUD", "Australian Dollar"),
            Currency::new("CAD", "Canadian Dollar"),
            Currency::new("EUR", "Euro"),
            Currency::new("GBP", "British Pound Sterling"),
            Currency::new("USD", "United States Dollar"),
        ]
    }

    #[test]
    fn test_filter_empty_query_returns_all() {
        let list = currencies();
        assert_eq!(filter_currencies(&list, "").len(), 5);
    }

    #[test]
    fn test_filter_matches_code_and_name() {
        let list = currencies();
        let dollars: Vec<&str> = filter_currencies(&list, "dollar")
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(dollars, vec!["AUD", "CAD", "USD"]);

        let gbp = filter_currencies(&list, "gbp");
        assert_eq!(gbp.len(), 1);
        assert_eq!(gbp[0].code, "GBP");
    }

    #[test]
    fn test_open_highlights_current_selection() {
        let list = currencies();
        let current = Currency::new("EUR", "Euro");
        let picker = CurrencyPicker::open(PickerSide::Counter, &list, Some(&current));
        assert_eq!(picker.selected, 2);
        assert_eq!(picker.selection(&list).unwrap().code, "EUR");
        assert_eq!(picker.side.title(), "To");
    }

    #[test]
    fn test_typing_filters_and_resets_highlight() {
        let list = currencies();
        let mut picker = CurrencyPicker::open(PickerSide::Base, &list, None);
        picker.move_down(&list);
        picker.move_down(&list);

        for c in "can".chars() {
            picker.push_char(c);
        }
        assert_eq!(picker.selected, 0);
        assert_eq!(picker.selection(&list).unwrap().code, "CAD");

        picker.pop_char();
        picker.pop_char();
        assert_eq!(picker.query, "c");
    }

    #[test]
    fn test_navigation_wraps() {
        let list = currencies();
        let mut picker = CurrencyPicker::open(PickerSide::Base, &list, None);

        picker.move_up(&list);
        assert_eq!(picker.selection(&list).unwrap().code, "USD");

        picker.move_down(&list);
        assert_eq!(picker.selection(&list).unwrap().code, "AUD");
    }

    #[test]
    fn test_no_match_has_no_selection() {
        let list = currencies();
        let mut picker = CurrencyPicker::open(PickerSide::Base, &list, None);
        for c in "zzz".chars() {
            picker.push_char(c);
        }
        picker.move_down(&list);
        picker.move_up(&list);
        assert!(picker.selection(&list).is_none());
    }
}
