mod booking;
mod clock;
mod manager;
mod room;

use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::booking::*;
pub use self::clock::*;
pub use self::manager::*;
pub use self::room::*;

pub trait Id:
    Copy
    + Eq
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner: FromStr;
}

pub trait Entity {
    type Id: Id;

    const ENTITY_NAME: &'static str;

    fn id(&self) -> Self::Id;
}

/// ストアから返されるエラー
#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Data read error: {0}")]
    ReadError(Box<dyn Error + Send + Sync>),
    #[error("Data write error: {0}")]
    WriteError(Box<dyn Error + Send + Sync>),
    #[error("Client side error: {0}")]
    ClientSideError(Box<dyn Error + Send + Sync>),
}
