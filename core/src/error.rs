use sea_orm::DbErr;

/// Reasons a raw address input was rejected by [`crate::addr::classify`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddrError {
    #[error("not a valid IPv4 address")]
    NotIpv4Host,
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
    #[error("invalid range: {0}")]
    InvalidRange(String),
    #[error("range start greater than end")]
    RangeStartAfterEnd,
    #[error("malformed address input")]
    Malformed,
    #[error("only IPv4 is supported")]
    OnlyIpv4,
}

/// An error returned by the netls services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidAddress(#[from] AddrError),
    #[error("{0}")]
    InvalidParam(String),
    #[error("{0} not found")]
    ObjectNotFound(String),
    #[error("{0} already exists")]
    ObjectExists(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Response code and message carried in every API envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrCode {
    pub code: i32,
    pub msg: &'static str,
}

impl ErrCode {
    pub const SUCCEED: ErrCode = ErrCode { code: 0, msg: "Ok" };
    pub const PARAM_ERROR: ErrCode = ErrCode {
        code: 201,
        msg: "parameter error",
    };
    pub const NOT_FOUND: ErrCode = ErrCode {
        code: 202,
        msg: "object not found",
    };
    pub const OBJECT_EXISTS: ErrCode = ErrCode {
        code: 203,
        msg: "object already exists",
    };
    pub const SERVER_ERROR: ErrCode = ErrCode {
        code: 500,
        msg: "server error",
    };
}

impl ServiceError {
    pub fn code(&self) -> ErrCode {
        match self {
            ServiceError::InvalidAddress(_) | ServiceError::InvalidParam(_) => ErrCode::PARAM_ERROR,
            ServiceError::ObjectNotFound(_) => ErrCode::NOT_FOUND,
            ServiceError::ObjectExists(_) => ErrCode::OBJECT_EXISTS,
            ServiceError::Db(_) => ErrCode::SERVER_ERROR,
        }
    }

    pub(crate) fn param(msg: impl Into<String>) -> Self {
        ServiceError::InvalidParam(msg.into())
    }

    pub(crate) fn not_found(what: &str, id: i32) -> Self {
        ServiceError::ObjectNotFound(format!("{what} {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_the_envelope_table() {
        assert_eq!(ServiceError::from(AddrError::Malformed).code().code, 201);
        assert_eq!(ServiceError::param("bad").code().code, 201);
        assert_eq!(ServiceError::not_found("vendor", 3).code().code, 202);
        assert_eq!(ServiceError::ObjectExists("x".into()).code().code, 203);
        assert_eq!(
            ServiceError::from(DbErr::Custom("boom".into())).code(),
            ErrCode::SERVER_ERROR
        );
    }

    #[test]
    fn address_errors_keep_their_message() {
        let err = ServiceError::from(AddrError::RangeStartAfterEnd);
        assert_eq!(err.to_string(), "range start greater than end");
        assert_eq!(ServiceError::not_found("vendor", 3).to_string(), "vendor 3 not found");
    }
}
