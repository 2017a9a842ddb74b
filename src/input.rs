/// Coerce raw text from the point-count field.
///
/// Empty text means an empty field (0). Numbers are clamped into
/// `[min, max]`, digit strings too long to parse count as `max`, and
/// anything else leaves `current` untouched.
pub fn coerce_point_count(raw: &str, current: usize, min: usize, max: usize) -> usize {
    let max = max.max(min);
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    match raw.parse::<i64>() {
        Ok(n) if n < min as i64 => min,
        Ok(n) => (n as u64).min(max as u64) as usize,
        Err(_) if raw.chars().all(|c| c.is_ascii_digit()) => max,
        Err(_) => current,
    }
}

/// Editable point-count field as shown in the header
#[derive(Debug, Clone, PartialEq)]
pub struct PointCountField {
    text: String,
    min: usize,
    max: usize,
}

impl PointCountField {
    pub fn new(initial: usize, min: usize, max: usize) -> Self {
        let mut field = Self {
            text: String::new(),
            min,
            max,
        };
        if initial > 0 {
            field.set_text(&initial.to_string());
        }
        field
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> usize {
        self.text.parse().unwrap_or(0)
    }

    /// Replace the contents, returning the coerced value
    pub fn set_text(&mut self, raw: &str) -> usize {
        let value = coerce_point_count(raw, self.value(), self.min, self.max);
        self.text = if value == 0 {
            String::new()
        } else {
            value.to_string()
        };
        value
    }

    pub fn push_digit(&mut self, c: char) -> usize {
        if !c.is_ascii_digit() {
            return self.value();
        }
        let raw = format!("{}{c}", self.text);
        self.set_text(&raw)
    }

    pub fn backspace(&mut self) -> usize {
        let mut raw = self.text.clone();
        raw.pop();
        self.set_text(&raw)
    }

    pub fn increment(&mut self) -> usize {
        let raw = (self.value() + 1).to_string();
        self.set_text(&raw)
    }

    pub fn decrement(&mut self) -> usize {
        let raw = self.value().saturating_sub(1).max(self.min).to_string();
        self.set_text(&raw)
    }
}
