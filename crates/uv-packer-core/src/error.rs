use thiserror::Error;

#[derive(Debug, Error)]
pub enum UvPackError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Out of space: placed {placed} of {total} rectangles within the maximum size")]
    OutOfSpace { placed: usize, total: usize },
}

impl UvPackError {
    /// True for failures that a larger `max_size` might resolve.
    pub fn is_out_of_space(&self) -> bool {
        matches!(self, Self::OutOfSpace { .. })
    }
}

pub type Result<T> = std::result::Result<T, UvPackError>;
