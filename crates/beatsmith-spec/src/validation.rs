//! Request validation.

use crate::error::ParamError;
use crate::params::{
    GenerateParams, MAX_GENRE_LEN, MAX_LENGTH_BARS, MAX_TEMPO, MIN_LENGTH_BARS, MIN_TEMPO,
};

/// Validate a generation request.
///
/// Enum-typed fields are valid by construction; this checks the numeric
/// ranges and the free-form genre string. Returns the first violation found.
pub fn validate_params(params: &GenerateParams) -> Result<(), ParamError> {
    if params.length_bars < MIN_LENGTH_BARS || params.length_bars > MAX_LENGTH_BARS {
        return Err(ParamError::LengthBarsOutOfRange(params.length_bars));
    }
    if params.tempo < MIN_TEMPO || params.tempo > MAX_TEMPO {
        return Err(ParamError::TempoOutOfRange(params.tempo));
    }
    if params.genre.is_empty() {
        return Err(ParamError::EmptyGenre);
    }
    if params.genre.chars().count() > MAX_GENRE_LEN {
        return Err(ParamError::GenreTooLong(params.genre.chars().count()));
    }
    Ok(())
}
