//! Login and logout.

use super::session::Session;
use crate::logger::Status;
use anyhow::{Result, bail};

pub fn login(session: &Session, password: &str) -> Result<()> {
    if password.trim().is_empty() {
        bail!("login failed: password required");
    }

    let provider = session.provider();
    let first = !provider.has_passphrase();
    if !provider.login(password) {
        bail!("login failed: passphrase does not match");
    }

    if first {
        Status::new().success("passphrase set, editing unlocked");
    } else {
        Status::new().success("editing unlocked");
    }
    Ok(())
}

pub fn logout(session: &Session) -> Result<()> {
    session.provider().logout();
    Status::new().success("editing locked");
    Ok(())
}
