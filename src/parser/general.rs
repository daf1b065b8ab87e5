use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{digit1, multispace0},
    combinator::map_res,
    number::complete::double,
    sequence::{delimited, preceded},
    IResult,
};

pub fn decimal(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |out: &str| out.parse::<usize>())(input)
}

/// Signed float, integer or exponent notation.
pub fn float(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// A whitespace-free token such as a k-point label.
pub fn label(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// `<header> <usize>` followed by optional whitespace.
pub fn header_count<'a>(header: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, usize> {
    preceded(tag(header), delimited(multispace0, decimal, multispace0))
}
