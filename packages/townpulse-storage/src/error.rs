pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Mongo(#[from] Box<mongodb::error::Error>),
}
impl From<mongodb::error::Error> for Error {
	fn from(err: mongodb::error::Error) -> Self {
		Self::Mongo(Box::new(err))
	}
}
