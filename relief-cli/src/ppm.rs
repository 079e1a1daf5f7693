/// Binary PPM (P6) reader
use nom::{
    branch::alt,
    bytes::complete::{tag, take},
    character::complete::{char, digit1, multispace1, not_line_ending},
    combinator::{map_opt, value, verify},
    multi::many1,
    sequence::{pair, preceded},
    IResult,
};

use crate::CliError;

/// An 8-bit RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

/// Parse a binary PPM with a maximum sample value of 255.
pub fn parse_ppm(data: &[u8]) -> Result<RgbImage, CliError> {
    let (body, (width, height, maxval)) = header(data).map_err(|_| CliError::Ppm {
        message: "missing or malformed P6 header".to_string(),
    })?;

    if width == 0 || height == 0 {
        return Err(CliError::Ppm {
            message: format!("image has no pixels ({width}x{height})"),
        });
    }
    if maxval != 255 {
        return Err(CliError::Ppm {
            message: format!("only 8-bit samples are supported, maxval is {maxval}"),
        });
    }

    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| CliError::Ppm {
            message: format!("{width}x{height} image is too large"),
        })?;
    if body.len() < expected {
        return Err(CliError::Ppm {
            message: format!(
                "pixel data truncated: expected {expected} bytes, got {}",
                body.len()
            ),
        });
    }

    Ok(RgbImage {
        width,
        height,
        pixels: body[..expected].to_vec(),
    })
}

fn header(input: &[u8]) -> IResult<&[u8], (usize, usize, usize)> {
    let (input, _) = tag("P6")(input)?;
    let (input, width) = preceded(separator, number)(input)?;
    let (input, height) = preceded(separator, number)(input)?;
    let (input, maxval) = preceded(separator, number)(input)?;
    // Exactly one whitespace byte separates the header from the samples.
    let (input, _) = verify(take(1usize), |b: &[u8]| b[0].is_ascii_whitespace())(input)?;
    Ok((input, (width, height, maxval)))
}

/// Whitespace and `#` comments between header fields
fn separator(input: &[u8]) -> IResult<&[u8], ()> {
    value(
        (),
        many1(alt((
            value((), multispace1),
            value((), pair(char('#'), not_line_ending)),
        ))),
    )(input)
}

fn number(input: &[u8]) -> IResult<&[u8], usize> {
    map_opt(digit1, |digits: &[u8]| {
        std::str::from_utf8(digits).ok()?.parse().ok()
    })(input)
}
