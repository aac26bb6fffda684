use crate::error::{BsError, BsResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Principal {
    /// Public, unauthenticated caller. May read, never write.
    Anonymous,
    /// Ingestion process holding the service key.
    Service,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
pub enum Operation {
    Read,
    Write,
}

impl Principal {
    /// Resolves the caller from the key it presents. An empty configured key
    /// grants nothing, so a fresh install is read-only until a key is set.
    pub fn from_key(presented: Option<&str>, configured: &str) -> Self {
        match presented {
            Some(key) if !configured.is_empty() && key == configured => Principal::Service,
            _ => Principal::Anonymous,
        }
    }
}

pub fn authorize(principal: Principal, operation: Operation) -> BsResult<()> {
    match (principal, operation) {
        (_, Operation::Read) => Ok(()),
        (Principal::Service, Operation::Write) => Ok(()),
        (Principal::Anonymous, Operation::Write) => Err(BsError::AccessDenied {
            message: format!("{principal} principal may not perform {operation}"),
        }),
    }
}
