//! Transactional product session — the menu loop of the product exercise.
//!
//! `ProductSession` owns one [`Gateway`] for its whole life and keeps a single
//! transaction open across menu choices:
//! 1. Create/List/Update/Delete run one statement each and leave the result
//!    pending; nothing is committed implicitly.
//! 2. Commit and Rollback close the transaction; the next statement opens a
//!    fresh one.
//! 3. A store failure while handling a choice is answered with exactly one
//!    rollback, both outcomes are reported, and the loop goes on.
//! 4. Exit tries one final commit and, if that fails, one rollback.

use std::io::{BufRead, Write};

use db::models::Product;
use db::repository::products as product_repo;
use db::{DbError, Gateway};
use tracing::{error, info, instrument, warn};

use crate::console::Console;
use crate::error::{InputError, SessionError};
use crate::view;

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Create,
    List,
    Update,
    Delete,
    Commit,
    Rollback,
    Exit,
}

impl Choice {
    pub fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(Self::Create),
            2 => Some(Self::List),
            3 => Some(Self::Update),
            4 => Some(Self::Delete),
            5 => Some(Self::Commit),
            6 => Some(Self::Rollback),
            0 => Some(Self::Exit),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingChoice,
    Exited(SessionExit),
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    /// Exit chosen and the final commit succeeded.
    Committed,
    /// Exit chosen, the final commit failed, the compensating rollback
    /// succeeded.
    RolledBack,
    /// Exit chosen and both the final commit and the rollback failed. The
    /// server may still hold the transaction.
    Unresolved,
    /// The input ended before Exit was chosen; pending work was rolled back.
    InputClosed,
}

/// Result of one successfully handled choice.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Inserted(u64),
    Listed(Vec<Product>),
    Updated { id: i32, rows: u64 },
    Deleted { id: i32, rows: u64 },
    Committed,
    RolledBack,
    Exited(SessionExit),
}

/// Prompt texts for the four product fields.
struct ProductPrompts {
    id: &'static str,
    name: &'static str,
    price: &'static str,
    quantity: &'static str,
}

const CREATE_PROMPTS: ProductPrompts = ProductPrompts {
    id: "Enter ProductID (int): ",
    name: "Enter ProductName: ",
    price: "Enter Price (decimal): ",
    quantity: "Enter Quantity (int): ",
};

const UPDATE_PROMPTS: ProductPrompts = ProductPrompts {
    id: "Enter ProductID to update: ",
    name: "Enter new ProductName: ",
    price: "Enter new Price: ",
    quantity: "Enter new Quantity: ",
};

// ---------------------------------------------------------------------------
// ProductSession
// ---------------------------------------------------------------------------

pub struct ProductSession<R, W> {
    gateway: Gateway,
    console: Console<R, W>,
    state: SessionState,
}

impl<R: BufRead, W: Write> ProductSession<R, W> {
    pub fn new(gateway: Gateway, console: Console<R, W>) -> Self {
        Self {
            gateway,
            console,
            state: SessionState::AwaitingChoice,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the menu until the user exits or the input ends.
    ///
    /// # Errors
    /// Only console failures escape; store failures are handled in the loop.
    #[instrument(skip_all)]
    pub async fn run(&mut self) -> Result<SessionExit, SessionError> {
        self.print_header()?;
        loop {
            if let Some(exit) = self.step().await? {
                info!("product session ended: {exit:?}");
                return Ok(exit);
            }
        }
    }

    /// Show the menu, read one choice and handle it.
    ///
    /// Returns `Some` once the session has reached [`SessionState::Exited`].
    pub async fn step(&mut self) -> Result<Option<SessionExit>, SessionError> {
        if let SessionState::Exited(exit) = self.state {
            return Ok(Some(exit));
        }

        self.show_menu()?;
        let number = match self.console.read_int("Enter your choice: ") {
            Ok(n) => n,
            Err(InputError::Closed) => return self.abandon().await.map(Some),
            Err(e) => return Err(e.into()),
        };

        let Some(choice) = Choice::from_number(number) else {
            self.console.say("Invalid option. Please try again.")?;
            return Ok(None);
        };

        match self.perform(choice).await {
            Ok(Outcome::Exited(exit)) => return Ok(Some(exit)),
            Ok(outcome) => self.report(outcome)?,
            Err(SessionError::Db(err)) => self.recover(err).await?,
            Err(e) if e.is_input_closed() => return self.abandon().await.map(Some),
            Err(e) => return Err(e),
        }
        Ok(None)
    }

    /// Give the connection back. Anything still pending is rolled back.
    pub async fn close(self) {
        self.gateway.close().await;
    }

    /// Tear the session apart; tests inspect the console afterwards.
    pub fn into_parts(self) -> (Gateway, Console<R, W>) {
        (self.gateway, self.console)
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    async fn perform(&mut self, choice: Choice) -> Result<Outcome, SessionError> {
        match choice {
            Choice::Create => {
                self.console.say("-- Create Product --")?;
                let product = self.read_product(&CREATE_PROMPTS)?;
                let conn = self.gateway.transaction().await?;
                let rows = product_repo::insert_product(conn, &product).await?;
                Ok(Outcome::Inserted(rows))
            }
            Choice::List => {
                self.console.say("-- Product List --")?;
                let conn = self.gateway.transaction().await?;
                let products = product_repo::list_products(conn).await?;
                Ok(Outcome::Listed(products))
            }
            Choice::Update => {
                self.console.say("-- Update Product --")?;
                let product = self.read_product(&UPDATE_PROMPTS)?;
                let conn = self.gateway.transaction().await?;
                let rows = product_repo::update_product(conn, &product).await?;
                Ok(Outcome::Updated { id: product.id, rows })
            }
            Choice::Delete => {
                self.console.say("-- Delete Product --")?;
                let id = self.console.read_int("Enter ProductID to delete: ")?;
                let conn = self.gateway.transaction().await?;
                let rows = product_repo::delete_product(conn, id).await?;
                Ok(Outcome::Deleted { id, rows })
            }
            Choice::Commit => {
                self.gateway.commit().await?;
                Ok(Outcome::Committed)
            }
            Choice::Rollback => {
                self.gateway.rollback().await?;
                Ok(Outcome::RolledBack)
            }
            Choice::Exit => Ok(Outcome::Exited(self.exit().await?)),
        }
    }

    fn read_product(&mut self, prompts: &ProductPrompts) -> Result<Product, InputError> {
        let id = self.console.read_int(prompts.id)?;
        let name = self.console.read_line(prompts.name)?;
        let price = self.console.read_decimal(prompts.price)?;
        let quantity = self.console.read_int(prompts.quantity)?;
        Ok(Product { id, name, price, quantity })
    }

    fn report(&mut self, outcome: Outcome) -> Result<(), SessionError> {
        match outcome {
            Outcome::Inserted(rows) => {
                self.console
                    .say(format!("{rows} product(s) inserted. Pending commit."))?;
            }
            Outcome::Listed(products) => view::product_table(self.console.out(), &products)?,
            Outcome::Updated { id, rows } | Outcome::Deleted { id, rows } if rows == 0 => {
                self.console
                    .say(format!("No product found with ProductID: {id}"))?;
            }
            Outcome::Updated { rows, .. } => {
                self.console
                    .say(format!("{rows} product(s) updated. Pending commit."))?;
            }
            Outcome::Deleted { rows, .. } => {
                self.console
                    .say(format!("{rows} product(s) deleted. Pending commit."))?;
            }
            Outcome::Committed => self.console.say("Transaction committed successfully.")?,
            Outcome::RolledBack => self.console.say("Transaction rolled back.")?,
            Outcome::Exited(_) => {}
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Failure handling and termination
    // -----------------------------------------------------------------------

    /// One rollback after a failed choice; the failed operation is not
    /// retried and the loop continues whatever the rollback does. With no
    /// transaction open (a failed `BEGIN`, or a rollback that already closed
    /// it) there is nothing to send.
    async fn recover(&mut self, err: DbError) -> Result<(), SessionError> {
        warn!("operation failed ({:?}): {err}", err.kind());
        self.console.say(format!("Operation failed: {err}"))?;

        if !err.is_store_failure() {
            return Ok(());
        }
        if !self.gateway.has_pending() {
            self.console.say("No pending changes to roll back.")?;
            return Ok(());
        }

        match self.gateway.rollback().await {
            Ok(()) => self.console.say("Rolled back due to error.")?,
            Err(rb) => {
                error!("rollback after failure did not complete: {rb}");
                self.console.say(format!("Rollback failed: {rb}"))?;
            }
        }
        Ok(())
    }

    async fn exit(&mut self) -> Result<SessionExit, SessionError> {
        let exit = self.finish().await?;
        self.state = SessionState::Exited(exit);
        Ok(exit)
    }

    async fn finish(&mut self) -> Result<SessionExit, SessionError> {
        let commit_err = match self.gateway.commit().await {
            Ok(()) => {
                self.console.say("Final commit done. Goodbye!")?;
                return Ok(SessionExit::Committed);
            }
            Err(e) => e,
        };

        warn!("final commit failed: {commit_err}");
        self.console.say(format!(
            "Commit failed on exit ({commit_err}), attempting rollback..."
        ))?;

        match self.gateway.rollback().await {
            Ok(()) => {
                self.console.say("Pending changes rolled back. Goodbye!")?;
                Ok(SessionExit::RolledBack)
            }
            Err(rb) => {
                error!("rollback after failed final commit did not complete: {rb}");
                self.console.say(format!("Rollback failed: {rb}"))?;
                Ok(SessionExit::Unresolved)
            }
        }
    }

    /// Input ended without an explicit exit: discard pending work.
    async fn abandon(&mut self) -> Result<SessionExit, SessionError> {
        self.state = SessionState::Exited(SessionExit::InputClosed);
        let pending = self.gateway.has_pending();

        if let Err(e) = self.gateway.rollback().await {
            error!("rollback on closed input failed: {e}");
        }
        self.console.blank()?;
        if pending {
            self.console
                .say("Input closed; uncommitted changes were rolled back.")?;
        } else {
            self.console.say("Input closed.")?;
        }
        Ok(SessionExit::InputClosed)
    }

    fn show_menu(&mut self) -> Result<(), SessionError> {
        let c = &mut self.console;
        c.blank()?;
        c.say("================= Product CRUD Menu =================")?;
        c.say("1. Create Product")?;
        c.say("2. View All Products")?;
        c.say("3. Update Product")?;
        c.say("4. Delete Product")?;
        c.say("5. Commit Transaction")?;
        c.say("6. Rollback Transaction")?;
        c.say("0. Exit")?;
        c.say("=====================================================")?;
        Ok(())
    }

    fn print_header(&mut self) -> Result<(), SessionError> {
        let c = &mut self.console;
        c.say("=====================================================")?;
        c.say(" Product CRUD (prepared statements + manual transactions)")?;
        c.say(" Table: Product")?;
        c.say("=====================================================")?;
        Ok(())
    }
}
