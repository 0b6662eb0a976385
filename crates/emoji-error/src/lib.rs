#[macro_use]
extern crate tracing;

use std::{
    fmt::{self, Debug, Display},
    io,
};

mod axum;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[macro_export]
macro_rules! bail {
    ($(type = $type:expr,)? $msg:expr) => {
        return Err($crate::emoji_error!($(type = $type,)? $msg));
    };
}

#[macro_export]
macro_rules! emoji_error {
    (type = $type:expr, $msg:expr) => {
        $crate::Error::msg($msg).with_error_type($type)
    };
    ($msg:expr) => {
        $crate::emoji_error!(type = $crate::ErrorType::Other(None), $msg)
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorType {
    /// Malformed shortcode or emoji set
    InvalidArgument(Option<String>),
    /// Image input is neither a byte stream nor a buffer
    InvalidInputKind,
    /// Image input ended before yielding a single chunk
    EmptyInput,
    /// Leading bytes didn't match any known image signature
    NotAnImage,
    /// No binary store is configured
    FeatureDisabled,
    Forbidden(Option<String>),
    /// Uniqueness constraint violated
    Conflict,
    NotFound,
    Other(Option<String>),
}

#[derive(Debug)]
pub struct Error {
    ty: ErrorType,
    inner: eyre::Report,
}

impl Error {
    #[inline]
    pub fn new<E>(ty: ErrorType, err: E) -> Self
    where
        E: Into<eyre::Report>,
    {
        Self {
            ty,
            inner: err.into(),
        }
    }

    /// Convert a boxed backend error
    ///
    /// I/O "not found" errors keep their meaning and are mapped onto [`ErrorType::NotFound`]
    #[must_use]
    pub fn from_boxed(err: BoxError) -> Self {
        let ty = match err.downcast_ref::<io::Error>() {
            Some(io_err) if io_err.kind() == io::ErrorKind::NotFound => ErrorType::NotFound,
            _ => ErrorType::Other(None),
        };

        Self {
            ty,
            inner: eyre::Report::msg(err),
        }
    }

    #[inline]
    pub fn msg<M>(msg: M) -> Self
    where
        M: Debug + Display + Send + Sync + 'static,
    {
        eyre::Report::msg(msg).into()
    }

    #[must_use]
    pub fn error_type(&self) -> &ErrorType {
        &self.ty
    }

    #[must_use]
    pub fn error(&self) -> &eyre::Report {
        &self.inner
    }

    #[must_use]
    pub fn into_error(self) -> eyre::Report {
        self.inner
    }

    #[must_use]
    pub fn with_error_type(self, ty: ErrorType) -> Self {
        Self { ty, ..self }
    }
}

impl<T> From<T> for Error
where
    T: Into<eyre::Report>,
{
    fn from(value: T) -> Self {
        Self {
            ty: ErrorType::Other(None),
            inner: value.into(),
        }
    }
}

impl From<Error> for BoxError {
    fn from(value: Error) -> Self {
        BoxError::from(value.inner)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <eyre::Report as fmt::Display>::fmt(&self.inner, f)
    }
}
