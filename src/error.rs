use thiserror::Error;

#[derive(Debug, Error)]
pub enum AzpollError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error(transparent)]
    Parse(#[from] crate::resourceids::ParseError),

    #[error(transparent)]
    Arm(#[from] crate::arm::ArmError),

    #[error(transparent)]
    Poll(#[from] crate::pollers::PollError),

    #[error("configuration error: {0}")]
    Config(String),
}
