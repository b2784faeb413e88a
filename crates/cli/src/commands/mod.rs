//! Subcommand arguments and their mapping onto storefront commands.

use bistro_core::{Customization, LineId, ProductId};
use bistro_storefront::Command;
use clap::{Args, Subcommand};
use thiserror::Error;

/// Errors in command-line arguments that clap cannot catch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("expected name=value, got '{0}'")]
    MalformedVariable(String),
}

#[derive(Subcommand, Debug)]
pub enum CartAction {
    /// Add a product from the menu
    Add(AddArgs),
    /// Change a line's quantity by a delta (e.g. 2 or -1)
    Update {
        /// Line ID as shown by `cart show`
        line_id: String,

        /// Servings to add; negative removes servings
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Remove a line
    Remove {
        /// Line ID as shown by `cart show`
        line_id: String,
    },
    /// Remove every line
    Clear,
    /// Show lines, totals and subtotal
    Show,
    /// Send the cart to the restaurant
    Checkout,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Menu product ID
    pub product_id: i32,

    /// Number of servings (1-99)
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Sauce option slug
    #[arg(long)]
    pub sauce: Option<String>,

    /// Fries option slug (`none` for no fries)
    #[arg(long)]
    pub fries: Option<String>,

    /// Extra option slug; repeat for several extras
    #[arg(long = "extra")]
    pub extras: Vec<String>,

    /// Ingredients to leave out
    #[arg(long = "without")]
    pub removal_notes: Option<String>,

    /// Free-text note for the kitchen
    #[arg(long = "note")]
    pub special_instructions: Option<String>,
}

impl AddArgs {
    /// Collect the customization flags.
    #[must_use]
    pub fn customization(&self) -> Customization {
        let mut customization = Customization::none();
        if let Some(sauce) = &self.sauce {
            customization = customization.with_sauce(sauce.as_str());
        }
        if let Some(fries) = &self.fries {
            customization = customization.with_fries(fries.as_str());
        }
        for extra in &self.extras {
            customization = customization.with_extra(extra.as_str());
        }
        if let Some(notes) = non_blank(self.removal_notes.as_deref()) {
            customization = customization.with_removal_notes(notes);
        }
        if let Some(text) = non_blank(self.special_instructions.as_deref()) {
            customization = customization.with_special_instructions(text);
        }
        customization
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Subcommand, Debug)]
pub enum LangAction {
    /// Switch the interface language (de, en, fr)
    Set { code: String },
    /// Show the active language
    Show,
}

/// Map a cart subcommand onto a storefront command.
#[must_use]
pub fn cart_command(action: CartAction) -> Command {
    match action {
        CartAction::Add(args) => Command::AddItem {
            product_id: ProductId::new(args.product_id),
            quantity: args.quantity,
            customization: args.customization(),
        },
        CartAction::Update { line_id, delta } => Command::UpdateQuantity {
            line_id: LineId::new(line_id),
            delta,
        },
        CartAction::Remove { line_id } => Command::RemoveItem {
            line_id: LineId::new(line_id),
        },
        CartAction::Clear => Command::ClearCart,
        CartAction::Show => Command::ShowCart,
        CartAction::Checkout => Command::Checkout,
    }
}

/// Parse a `--var name=value` argument.
///
/// # Errors
///
/// Returns an error if the argument is not in `name=value` form.
pub fn parse_variable(raw: &str) -> Result<(String, String), ArgError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(ArgError::MalformedVariable(raw.to_string())),
    }
}
