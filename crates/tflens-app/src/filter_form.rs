//! Text form for editing the server-side log filters

use tflens_core::{timestamp, LogFilters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Correlation,
    ResourceType,
    Phase,
    Level,
    Search,
    From,
    To,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Correlation,
        FilterField::ResourceType,
        FilterField::Phase,
        FilterField::Level,
        FilterField::Search,
        FilterField::From,
        FilterField::To,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Correlation => "tf_req_id",
            FilterField::ResourceType => "resource type",
            FilterField::Phase => "phase",
            FilterField::Level => "level",
            FilterField::Search => "search",
            FilterField::From => "from",
            FilterField::To => "to",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }
}

/// Editable copy of [`LogFilters`]. Status is not part of the form; it is
/// cycled directly from the log view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub field: FilterField,
    values: [String; 7],
}

impl FilterForm {
    pub fn from_filters(filters: &LogFilters) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let time = |v: &Option<chrono::DateTime<chrono::Utc>>| {
            v.map(|t| timestamp::to_wire(&t)).unwrap_or_default()
        };
        Self {
            field: FilterField::default(),
            values: [
                text(&filters.correlation_id),
                text(&filters.resource_type),
                text(&filters.phase),
                text(&filters.level),
                text(&filters.search),
                time(&filters.ts_from),
                time(&filters.ts_to),
            ],
        }
    }

    pub fn value(&self, field: FilterField) -> &str {
        &self.values[field.index()]
    }

    pub fn push(&mut self, c: char) {
        self.values[self.field.index()].push(c);
    }

    pub fn backspace(&mut self) {
        self.values[self.field.index()].pop();
    }

    pub fn clear_field(&mut self) {
        self.values[self.field.index()].clear();
    }

    pub fn next_field(&mut self) {
        let i = (self.field.index() + 1) % FilterField::ALL.len();
        self.field = FilterField::ALL[i];
    }

    pub fn prev_field(&mut self) {
        let len = FilterField::ALL.len();
        let i = (self.field.index() + len - 1) % len;
        self.field = FilterField::ALL[i];
    }

    /// Build filters from the form, keeping `base.status`. Blank fields
    /// clear their filter; an unparsable timestamp is an error naming the
    /// field.
    pub fn to_filters(&self, base: &LogFilters) -> Result<LogFilters, String> {
        let text = |field: FilterField| {
            let v = self.value(field).trim();
            (!v.is_empty()).then(|| v.to_string())
        };
        let time = |field: FilterField| match text(field) {
            None => Ok(None),
            Some(raw) => timestamp::parse(&raw)
                .map(Some)
                .ok_or_else(|| format!("Invalid {} timestamp: {}", field.label(), raw)),
        };
        Ok(LogFilters {
            correlation_id: text(FilterField::Correlation),
            resource_type: text(FilterField::ResourceType),
            phase: text(FilterField::Phase),
            level: text(FilterField::Level),
            status: base.status,
            search: text(FilterField::Search),
            ts_from: time(FilterField::From)?,
            ts_to: time(FilterField::To)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tflens_core::StatusFilter;

    #[test]
    fn test_round_trip_keeps_status() {
        let base = LogFilters {
            phase: Some("apply".into()),
            status: Some(StatusFilter::Error),
            ..Default::default()
        };
        let form = FilterForm::from_filters(&base);
        assert_eq!(form.value(FilterField::Phase), "apply");
        assert_eq!(form.to_filters(&base).unwrap(), base);
    }

    #[test]
    fn test_typing_into_fields() {
        let mut form = FilterForm::default();
        form.push('r');
        form.push('1');
        form.next_field();
        form.push('x');
        form.backspace();
        form.prev_field();
        assert_eq!(form.field, FilterField::Correlation);

        let filters = form.to_filters(&LogFilters::default()).unwrap();
        assert_eq!(filters.correlation_id.as_deref(), Some("r1"));
        assert!(filters.resource_type.is_none());
    }

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = FilterForm::default();
        form.prev_field();
        assert_eq!(form.field, FilterField::To);
        form.next_field();
        assert_eq!(form.field, FilterField::Correlation);
    }

    #[test]
    fn test_bad_timestamp_is_reported() {
        let mut form = FilterForm::default();
        form.field = FilterField::From;
        for c in "yesterday".chars() {
            form.push(c);
        }
        let err = form.to_filters(&LogFilters::default()).unwrap_err();
        assert!(err.contains("from"));
    }

    #[test]
    fn test_naive_timestamp_accepted() {
        let mut form = FilterForm::default();
        form.field = FilterField::To;
        for c in "2024-03-01T10:00:00".chars() {
            form.push(c);
        }
        let filters = form.to_filters(&LogFilters::default()).unwrap();
        assert!(filters.ts_to.is_some());
    }
}
