use crate::config::{ConstantsConfig, FormConfig};
use crate::engine::listing::{ListingInput, RoomType};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    City,
    RoomType,
    MaxGuests,
    NumBedrooms,
    MonthlySalary,
    MealPrice,
    DistanceCityCenter,
    CleanlinessScore,
    TaxiPricePerKm,
    MonthlyBasicUtilities,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    Integer { min: i64, max: i64 },
    Float { min: f64, max: Option<f64>, step: f64, precision: usize },
    Choice(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub key: FieldKey,
    pub value: String,
    pub field_type: FieldType,
    pub read_only: bool,
}

impl FormField {
    fn new(label: &str, key: FieldKey, value: String, field_type: FieldType) -> Self {
        Self {
            label: label.to_string(),
            key,
            value,
            field_type,
            read_only: false,
        }
    }

    fn fixed(label: &str, key: FieldKey, value: f64) -> Self {
        Self {
            label: label.to_string(),
            key,
            value: format!("{:.1}", value),
            field_type: FieldType::Float { min: 0.0, max: None, step: 0.0, precision: 1 },
            read_only: true,
        }
    }

    /// Range hint shown next to the value, e.g. "1-16".
    pub fn hint(&self) -> String {
        match &self.field_type {
            FieldType::Text => String::new(),
            FieldType::Integer { min, max } => format!("{}-{}", min, max),
            FieldType::Float { min, max: Some(max), precision, .. } => {
                format!("{:.*}-{:.*}", *precision, min, *precision, max)
            }
            FieldType::Float { min, max: None, precision, .. } => format!(">= {:.*}", *precision, min),
            FieldType::Choice(options) => format!("{} options", options.len()),
        }
    }

    /// Parse `raw` against this field's widget constraints. Out-of-range
    /// numbers are clamped (reported by the returned flag); unparseable input
    /// is rejected.
    fn normalize(&self, raw: &str) -> Result<(String, bool)> {
        let raw = raw.trim();
        match &self.field_type {
            FieldType::Text => {
                if raw.is_empty() {
                    anyhow::bail!("{} cannot be empty", self.label);
                }
                Ok((raw.to_string(), false))
            }
            FieldType::Integer { min, max } => {
                let n: i64 = raw
                    .parse()
                    .with_context(|| format!("{} must be a whole number, got {:?}", self.label, raw))?;
                let clamped = n.clamp(*min, *max);
                Ok((clamped.to_string(), clamped != n))
            }
            FieldType::Float { min, max, precision, .. } => {
                let x: f64 = raw
                    .parse()
                    .with_context(|| format!("{} must be a number, got {:?}", self.label, raw))?;
                if !x.is_finite() {
                    anyhow::bail!("{} must be a finite number", self.label);
                }
                let clamped = x.max(*min);
                let clamped = max.map_or(clamped, |m| clamped.min(m));
                Ok((format!("{:.*}", *precision, clamped), clamped != x))
            }
            FieldType::Choice(options) => {
                if !options.iter().any(|o| o == raw) {
                    anyhow::bail!("{} must be one of {}", self.label, options.join(", "));
                }
                Ok((raw.to_string(), false))
            }
        }
    }

    /// Move a numeric value by one step, or cycle a choice.
    fn step(&mut self, forward: bool) {
        match &self.field_type {
            FieldType::Text => {}
            FieldType::Integer { min, max } => {
                if let Ok(n) = self.value.parse::<i64>() {
                    let next = if forward { n + 1 } else { n - 1 };
                    self.value = next.clamp(*min, *max).to_string();
                }
            }
            FieldType::Float { min, max, step, precision } => {
                if let Ok(x) = self.value.parse::<f64>() {
                    let next = if forward { x + step } else { x - step };
                    let next = next.max(*min);
                    let next = max.map_or(next, |m| next.min(m));
                    self.value = format!("{:.*}", *precision, next);
                }
            }
            FieldType::Choice(options) => {
                if options.is_empty() {
                    return;
                }
                let n = options.len();
                let i = options.iter().position(|o| *o == self.value).unwrap_or(0);
                let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
                self.value = options[next].clone();
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub editing: bool,
    pub edit_buffer: String,
    /// Last validation message, cleared on the next successful edit.
    pub notice: Option<String>,
}

impl FormState {
    pub fn new(form: &FormConfig, constants: &ConstantsConfig) -> Self {
        Self {
            fields: build_form_fields(form, constants),
            selected_field: 0,
            editing: false,
            edit_buffer: String::new(),
            notice: None,
        }
    }

    pub fn selected(&self) -> &FormField {
        &self.fields[self.selected_field]
    }

    pub fn select_next(&mut self) {
        if !self.editing {
            self.selected_field = (self.selected_field + 1) % self.fields.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.editing {
            let n = self.fields.len();
            self.selected_field = (self.selected_field + n - 1) % n;
        }
    }

    /// Start editing the selected field. Choices and fixed values are not
    /// text-editable; choices cycle instead.
    pub fn begin_edit(&mut self) {
        let field = &mut self.fields[self.selected_field];
        if field.read_only {
            return;
        }
        if let FieldType::Choice(_) = field.field_type {
            field.step(true);
            return;
        }
        self.edit_buffer = field.value.clone();
        self.editing = true;
    }

    pub fn push_char(&mut self, c: char) {
        if self.editing {
            self.edit_buffer.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.editing {
            self.edit_buffer.pop();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    /// Apply the edit buffer. On rejection the previous value is kept.
    pub fn commit_edit(&mut self) -> Result<()> {
        if !self.editing {
            return Ok(());
        }
        self.editing = false;
        let raw = std::mem::take(&mut self.edit_buffer);
        let field = &mut self.fields[self.selected_field];
        match field.normalize(&raw) {
            Ok((value, clamped)) => {
                self.notice = clamped.then(|| format!("{} clamped to {}", field.label, value));
                field.value = value;
                Ok(())
            }
            Err(e) => {
                self.notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn step_selected(&mut self, forward: bool) {
        if self.editing {
            return;
        }
        let field = &mut self.fields[self.selected_field];
        if !field.read_only {
            field.step(forward);
        }
    }

    fn value_of(&self, key: FieldKey) -> Result<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .with_context(|| format!("form has no {:?} field", key))
    }

    fn number_of(&self, key: FieldKey) -> Result<f64> {
        let raw = self.value_of(key)?;
        raw.parse()
            .with_context(|| format!("{:?} is not a number: {:?}", key, raw))
    }

    /// Read the current form values into a submission.
    pub fn to_listing_input(&self) -> Result<ListingInput> {
        let room = self.value_of(FieldKey::RoomType)?;
        let room_type = RoomType::from_label(room)
            .with_context(|| format!("unknown room type {:?}", room))?;
        let whole = |key| -> Result<u8> {
            let raw = self.value_of(key)?;
            raw.parse()
                .with_context(|| format!("{:?} is not a whole number: {:?}", key, raw))
        };
        Ok(ListingInput {
            city: self.value_of(FieldKey::City)?.to_string(),
            room_type,
            max_guests: whole(FieldKey::MaxGuests)?,
            num_bedrooms: whole(FieldKey::NumBedrooms)?,
            monthly_salary: self.number_of(FieldKey::MonthlySalary)?,
            meal_price: self.number_of(FieldKey::MealPrice)?,
            distance_city_center: self.number_of(FieldKey::DistanceCityCenter)?,
            cleanliness_score: self.number_of(FieldKey::CleanlinessScore)?,
        })
    }
}

pub fn build_form_fields(form: &FormConfig, constants: &ConstantsConfig) -> Vec<FormField> {
    let money = |min: f64| FieldType::Float { min, max: None, step: 1.0, precision: 2 };
    let slider = |max: f64| FieldType::Float { min: 0.0, max: Some(max), step: 0.5, precision: 1 };

    vec![
        FormField::new("City", FieldKey::City, form.city.clone(), FieldType::Text),
        FormField::new(
            "Room Type",
            FieldKey::RoomType,
            form.room_type.label().to_string(),
            FieldType::Choice(RoomType::ALL.iter().map(|r| r.label().to_string()).collect()),
        ),
        FormField::new(
            "Max Guests",
            FieldKey::MaxGuests,
            form.max_guests.clamp(1, 16).to_string(),
            FieldType::Integer { min: 1, max: 16 },
        ),
        FormField::new(
            "Bedrooms",
            FieldKey::NumBedrooms,
            form.num_bedrooms.clamp(1, 10).to_string(),
            FieldType::Integer { min: 1, max: 10 },
        ),
        FormField::new(
            "City Avg Salary ($)",
            FieldKey::MonthlySalary,
            format!("{:.2}", form.monthly_salary),
            money(0.0),
        ),
        FormField::new(
            "Meal Price ($)",
            FieldKey::MealPrice,
            format!("{:.2}", form.meal_price),
            money(0.0),
        ),
        FormField::new(
            "Distance to Center (km)",
            FieldKey::DistanceCityCenter,
            format!("{:.1}", form.distance_city_center.clamp(0.0, 20.0)),
            slider(20.0),
        ),
        FormField::new(
            "Cleanliness Score",
            FieldKey::CleanlinessScore,
            format!("{:.1}", form.cleanliness_score.clamp(0.0, 10.0)),
            slider(10.0),
        ),
        FormField::fixed("Taxi Price per km ($)", FieldKey::TaxiPricePerKm, constants.taxi_price_per_km),
        FormField::fixed(
            "Monthly Basic Utilities ($)",
            FieldKey::MonthlyBasicUtilities,
            constants.monthly_basic_utilities,
        ),
    ]
}
