use crate::fields::FieldName;

/// Current textual value of every field plus the focused field.
///
/// Accepts any text, including empty or non-numeric input. Focus is
/// tracked for rendering only and never affects payload construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: [String; FieldName::COUNT],
    focus: Option<FieldName>,
}

impl FormValues {
    /// All fields start empty with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text for `field`, leaving the others unchanged.
    pub fn set_value(&mut self, field: FieldName, text: impl Into<String>) {
        self.values[field.ordinal()] = text.into();
    }

    pub fn value(&self, field: FieldName) -> &str {
        &self.values[field.ordinal()]
    }

    /// Record the focused field; `None` is a blur.
    pub fn set_focus(&mut self, field: Option<FieldName>) {
        self.focus = field;
    }

    pub fn focus(&self) -> Option<FieldName> {
        self.focus
    }

    pub fn is_focused(&self, field: FieldName) -> bool {
        self.focus == Some(field)
    }

    /// Fields in display order with their current text.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        FieldName::ALL
            .into_iter()
            .map(move |f| (f, self.value(f)))
    }

    /// Fields whose text is empty after trimming.
    pub fn blank_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, text)| text.trim().is_empty())
            .map(|(f, _)| f)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_unfocused() {
        let form = FormValues::new();
        assert!(form.iter().all(|(_, text)| text.is_empty()));
        assert_eq!(form.focus(), None);
        assert_eq!(form.blank_fields().len(), FieldName::COUNT);
    }

    #[test]
    fn set_value_touches_only_one_field() {
        let mut form = FormValues::new();
        form.set_value(FieldName::Glucose, "148");
        form.set_value(FieldName::Age, "not a number");

        assert_eq!(form.value(FieldName::Glucose), "148");
        assert_eq!(form.value(FieldName::Age), "not a number");
        assert_eq!(form.value(FieldName::Insulin), "");

        form.set_value(FieldName::Glucose, "");
        assert_eq!(form.value(FieldName::Glucose), "");
        assert_eq!(form.value(FieldName::Age), "not a number");
    }

    #[test]
    fn focus_and_blur() {
        let mut form = FormValues::new();
        form.set_focus(Some(FieldName::Bmi));
        assert!(form.is_focused(FieldName::Bmi));
        assert!(!form.is_focused(FieldName::Age));

        form.set_focus(None);
        assert_eq!(form.focus(), None);
    }
}
