//! Wishlist and compare commands.
//!
//! Both lists share one command surface. The compare list is bounded, so
//! adds past its capacity fail with a message instead of evicting.

use yasira_core::ProductId;
use yasira_storefront::collections::SetEntry;
use yasira_storefront::ToggleAction;

use super::{CommandError, Context};

/// Which list a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Wishlist,
    Compare,
}

impl ListKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Wishlist => "wishlist",
            Self::Compare => "compare list",
        }
    }
}

/// Snapshot the product from the catalog and add it.
pub fn add(ctx: &mut Context, kind: ListKind, product_id: ProductId) -> Result<(), CommandError> {
    let product = ctx.product(product_id)?;
    let name = product.name.clone();
    match kind {
        ListKind::Wishlist => {
            if !ctx.state.add_to_wishlist(product) {
                ctx.say(&format!("{name} is already in your wishlist"));
                return Ok(());
            }
        }
        ListKind::Compare => ctx.state.add_to_compare(product)?,
    }
    ctx.say(&format!("Added {name} to your {}", kind.label()));
    Ok(())
}

/// Remove a product if present.
pub fn remove(ctx: &mut Context, kind: ListKind, product_id: ProductId) {
    let removed = match kind {
        ListKind::Wishlist => ctx.state.remove_from_wishlist(product_id),
        ListKind::Compare => ctx.state.remove_from_compare(product_id),
    };
    if removed {
        ctx.say(&format!("Removed product {product_id} from your {}", kind.label()));
    } else {
        ctx.say(&format!("Product {product_id} is not in your {}", kind.label()));
    }
}

/// Add a product if absent, remove it if present.
pub fn toggle(
    ctx: &mut Context,
    kind: ListKind,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let product = ctx.product(product_id)?;
    let name = product.name.clone();
    let action = match kind {
        ListKind::Wishlist => {
            if ctx.state.toggle_wishlist(product) {
                ToggleAction::Added
            } else {
                ToggleAction::Removed
            }
        }
        ListKind::Compare => {
            let outcome = ctx.state.toggle_compare(product);
            outcome.result?;
            outcome.action
        }
    };
    let verb = match action {
        ToggleAction::Added => "Added",
        ToggleAction::Removed => "Removed",
    };
    ctx.say(&format!("{verb} {name} ({})", kind.label()));
    Ok(())
}

/// Remove every product.
pub fn clear(ctx: &mut Context, kind: ListKind) {
    match kind {
        ListKind::Wishlist => ctx.state.clear_wishlist(),
        ListKind::Compare => ctx.state.clear_compare(),
    }
    ctx.say(&format!("Cleared your {}", kind.label()));
}

/// Print the list in insertion order.
#[allow(clippy::print_stdout)]
pub fn show(ctx: &Context, kind: ListKind) -> Result<(), CommandError> {
    let (entries, record) = match kind {
        ListKind::Wishlist => (ctx.state.wishlist().entries(), ctx.state.wishlist().to_record()),
        ListKind::Compare => (ctx.state.compare().entries(), ctx.state.compare().to_record()),
    };
    if ctx.json {
        return super::print_json(&record);
    }

    if entries.is_empty() {
        println!("Your {} is empty.", kind.label());
        return Ok(());
    }
    for entry in entries {
        println!("{}", format_entry(ctx, entry));
    }
    if kind == ListKind::Compare {
        let compare = ctx.state.compare();
        println!("{} of {} slots used", compare.count(), compare.capacity());
    }
    Ok(())
}

fn format_entry(ctx: &Context, entry: &SetEntry) -> String {
    let product = entry.product();
    format!(
        "{:>4}  {:<40} {:<10} added {}",
        product.id.as_i64(),
        product.name,
        product.unit_price(ctx.config.pricing.currency).display(),
        entry.added_at().format("%Y-%m-%d %H:%M")
    )
}
