//! Editable working copies of ingredient and stage rows.
//!
//! An [`EditableList`] owns an ordered sequence of rows plus an edit-mode
//! flag. Rows are identified by position; newly added rows carry the
//! placeholder id 0 until a store assigns a real one.
//!
//! Rows live behind an `Arc` so a caller can hold a [`snapshot`] of the
//! previous state. Every mutation goes through `Arc::make_mut`, so a held
//! snapshot is never modified.
//!
//! [`snapshot`]: EditableList::snapshot

use std::sync::Arc;

use anyhow::{Result, bail};

use crate::models::{Ingredient, Stage, parse_quantity, parse_stage_order};

/// A record that can be edited inside an [`EditableList`].
pub trait Row: Clone {
    /// Typed update for exactly one field of the row.
    type Field;

    /// Record appended by `add_row`: id 0, numbers 0, strings empty.
    fn placeholder() -> Self;

    fn apply(&mut self, field: Self::Field);

    /// Build a typed update from a field name and raw text input.
    fn parse_field(name: &str, raw: &str) -> Result<Self::Field>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngredientField {
    Name(String),
    Quantity(f64),
    Unit(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageField {
    Order(i64),
    Description(String),
}

impl Row for Ingredient {
    type Field = IngredientField;

    fn placeholder() -> Self {
        Ingredient {
            id: 0,
            name: String::new(),
            quantity: 0.0,
            unit: String::new(),
        }
    }

    fn apply(&mut self, field: IngredientField) {
        match field {
            IngredientField::Name(name) => self.name = name,
            IngredientField::Quantity(quantity) => self.quantity = quantity,
            IngredientField::Unit(unit) => self.unit = unit,
        }
    }

    fn parse_field(name: &str, raw: &str) -> Result<IngredientField> {
        match name.trim().to_lowercase().as_str() {
            "name" => Ok(IngredientField::Name(raw.to_string())),
            "quantity" | "qty" => Ok(IngredientField::Quantity(parse_quantity(raw)?)),
            "unit" => Ok(IngredientField::Unit(raw.trim().to_string())),
            _ => bail!("Unknown ingredient field '{name}'. Valid: name, quantity, unit"),
        }
    }
}

impl Row for Stage {
    type Field = StageField;

    fn placeholder() -> Self {
        Stage {
            id: 0,
            order: 0,
            description: String::new(),
        }
    }

    fn apply(&mut self, field: StageField) {
        match field {
            StageField::Order(order) => self.order = order,
            StageField::Description(description) => self.description = description,
        }
    }

    fn parse_field(name: &str, raw: &str) -> Result<StageField> {
        match name.trim().to_lowercase().as_str() {
            "order" => Ok(StageField::Order(parse_stage_order(raw)?)),
            "description" | "text" => Ok(StageField::Description(raw.to_string())),
            _ => bail!("Unknown stage field '{name}'. Valid: order, description"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditableList<R> {
    rows: Arc<Vec<R>>,
    edit_mode: bool,
}

impl<R: Row> EditableList<R> {
    /// Start a working copy from `rows`. The slice is cloned, so later
    /// edits never reach the caller's data.
    #[must_use]
    pub fn new(rows: &[R]) -> Self {
        Self {
            rows: Arc::new(rows.to_vec()),
            edit_mode: false,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&self.rows)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.edit_mode
    }

    pub fn enter_edit(&mut self) {
        self.edit_mode = true;
    }

    pub fn exit_edit(&mut self) {
        self.edit_mode = false;
    }

    pub fn add_row(&mut self) -> Result<()> {
        self.require_edit_mode("add a row")?;
        Arc::make_mut(&mut self.rows).push(R::placeholder());
        Ok(())
    }

    /// Remove the row at `index`. Later rows move up one position; ids are
    /// left alone.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn delete_row(&mut self, index: usize) -> Result<()> {
        self.require_edit_mode("delete a row")?;
        self.check_index(index);
        Arc::make_mut(&mut self.rows).remove(index);
        Ok(())
    }

    /// Replace one field of the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_field(&mut self, index: usize, field: R::Field) -> Result<()> {
        self.require_edit_mode("change a row")?;
        self.check_index(index);
        Arc::make_mut(&mut self.rows)[index].apply(field);
        Ok(())
    }

    /// Like [`update_field`](Self::update_field), but from a field name and
    /// the raw text a user typed.
    pub fn update_named(&mut self, index: usize, name: &str, raw: &str) -> Result<()> {
        let field = R::parse_field(name, raw)?;
        self.update_field(index, field)
    }

    fn require_edit_mode(&self, action: &str) -> Result<()> {
        if !self.edit_mode {
            bail!("Cannot {action} outside edit mode");
        }
        Ok(())
    }

    fn check_index(&self, index: usize) {
        let len = self.rows.len();
        assert!(index < len, "row index {index} out of range for {len} rows");
    }
}

impl EditableList<Stage> {
    /// Make room for a stage at `start_order`: every stage with an order at
    /// or above it moves down by one.
    pub fn shift_orders_from(&mut self, start_order: i64) -> Result<()> {
        self.require_edit_mode("reorder stages")?;
        if let Some(stage) = self
            .rows
            .iter()
            .find(|s| s.order >= start_order && s.order == i64::MAX)
        {
            bail!("Stage order {} cannot be shifted any further", stage.order);
        }
        for stage in Arc::make_mut(&mut self.rows)
            .iter_mut()
            .filter(|s| s.order >= start_order)
        {
            stage.order += 1;
        }
        Ok(())
    }

    /// Rewrite stage orders as 1..=n following list position.
    pub fn renumber(&mut self) -> Result<()> {
        self.require_edit_mode("renumber stages")?;
        for (stage, order) in Arc::make_mut(&mut self.rows).iter_mut().zip(1..) {
            stage.order = order;
        }
        Ok(())
    }
}
