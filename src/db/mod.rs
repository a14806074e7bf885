//! Persistence module split across logical submodules. Only [`Gateway`] is
//! public; the per-table helpers take a plain `&Connection` so the gateway can
//! run them inside one transaction.

mod authors;
mod books;
mod connection;
mod gateway;
mod loans;

pub use gateway::Gateway;
