mod cli;
mod server;

pub(crate) use cli::{as_cli, as_info};
pub(crate) use server::as_server;
