use crate::country::CountryKey;

/// Where the current activation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Map,
    List,
}

/// Pointer and focus events the dashboard reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// Pointer entered a map feature that has a matching record.
    PointerEnter { key: CountryKey, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    /// A ranked-list row gained hover or focus.
    RowFocus(CountryKey),
    RowBlur,
}

/// How a rendered feature should be emphasized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is active: plain choropleth styling.
    Default,
    Active,
    /// Another country is active.
    Dimmed,
}

/// The single active country, if any, and the last pointer position over
/// the map (canvas coordinates).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    active: Option<(CountryKey, Source)>,
    pointer: Option<(f64, f64)>,
}

impl InteractionState {
    pub fn active(&self) -> Option<&CountryKey> {
        self.active.as_ref().map(|(k, _)| k)
    }

    pub fn source(&self) -> Option<Source> {
        self.active.as_ref().map(|(_, s)| *s)
    }

    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    fn release(&mut self, source: Source) {
        if self.source() == Some(source) {
            self.reset();
        }
    }

    pub fn apply(&mut self, event: Interaction) {
        match event {
            Interaction::PointerEnter { key, x, y } => {
                self.active = Some((key, Source::Map));
                self.pointer = Some((x, y));
            }
            Interaction::PointerMove { x, y } => {
                if self.source() == Some(Source::Map) {
                    self.pointer = Some((x, y));
                }
            }
            // each release event only ends an activation of its own kind
            Interaction::PointerLeave => self.release(Source::Map),
            Interaction::RowBlur => self.release(Source::List),
            Interaction::RowFocus(key) => {
                self.active = Some((key, Source::List));
                self.pointer = None;
            }
        }
    }

    /// Back to idle; also used when a new report replaces the dataset.
    pub fn reset(&mut self) {
        self.active = None;
        self.pointer = None;
    }

    pub fn emphasis(&self, key: Option<&CountryKey>) -> Emphasis {
        match (self.active(), key) {
            (None, _) => Emphasis::Default,
            (Some(active), Some(key)) if active == key => Emphasis::Active,
            (Some(_), _) => Emphasis::Dimmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str) -> CountryKey {
        CountryKey::Iso(code.into())
    }

    #[test]
    fn entering_another_feature_replaces_the_active_key() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerEnter { key: key("CN"), x: 10.0, y: 10.0 });
        state.apply(Interaction::PointerEnter { key: key("BY"), x: 20.0, y: 5.0 });
        assert_eq!(state.active(), Some(&key("BY")));
        assert_eq!(state.pointer(), Some((20.0, 5.0)));
    }

    #[test]
    fn moving_keeps_the_key() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerEnter { key: key("CN"), x: 1.0, y: 1.0 });
        state.apply(Interaction::PointerMove { x: 3.0, y: 4.0 });
        assert_eq!(state.active(), Some(&key("CN")));
        assert_eq!(state.pointer(), Some((3.0, 4.0)));
    }

    #[test]
    fn moving_while_idle_does_nothing() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerMove { x: 3.0, y: 4.0 });
        assert_eq!(state, InteractionState::default());
    }

    #[test]
    fn leave_and_blur_return_to_idle() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerEnter { key: key("CN"), x: 1.0, y: 1.0 });
        state.apply(Interaction::PointerLeave);
        assert_eq!(state.active(), None);
        assert_eq!(state.pointer(), None);

        state.apply(Interaction::RowFocus(key("US")));
        assert_eq!(state.source(), Some(Source::List));
        state.apply(Interaction::RowBlur);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn release_only_ends_its_own_kind_of_activation() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerEnter { key: key("CN"), x: 1.0, y: 1.0 });
        state.apply(Interaction::RowBlur);
        assert_eq!(state.active(), Some(&key("CN")));
        assert_eq!(state.source(), Some(Source::Map));
        assert_eq!(state.pointer(), Some((1.0, 1.0)));

        state.apply(Interaction::RowFocus(key("BY")));
        state.apply(Interaction::PointerLeave);
        assert_eq!(state.active(), Some(&key("BY")));
        assert_eq!(state.source(), Some(Source::List));

        state.apply(Interaction::RowBlur);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn row_focus_replaces_map_hover() {
        let mut state = InteractionState::default();
        state.apply(Interaction::PointerEnter { key: key("CN"), x: 1.0, y: 1.0 });
        state.apply(Interaction::RowFocus(key("BY")));
        assert_eq!(state.active(), Some(&key("BY")));
        assert_eq!(state.pointer(), None);
    }

    #[test]
    fn emphasis_follows_active_key() {
        let mut state = InteractionState::default();
        assert_eq!(state.emphasis(Some(&key("CN"))), Emphasis::Default);
        state.apply(Interaction::RowFocus(key("CN")));
        assert_eq!(state.emphasis(Some(&key("CN"))), Emphasis::Active);
        assert_eq!(state.emphasis(Some(&key("BY"))), Emphasis::Dimmed);
        assert_eq!(state.emphasis(None), Emphasis::Dimmed);
    }
}
