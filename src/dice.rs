use itertools::Itertools;
use nom::{
    bytes::complete::tag, character::complete::u32 as number, combinator::all_consuming,
    sequence::separated_pair, IResult,
};
use rand::Rng;

/// A dice expression in `NdN` form, e.g. `3d6`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiceSpec {
    pub rolls: u32,
    pub sides: u32,
}

fn parse_ndn(input: &str) -> IResult<&str, (u32, u32)> {
    all_consuming(separated_pair(number, tag("d"), number))(input)
}

pub fn parse_spec(input: &str) -> Option<DiceSpec> {
    let (_, (rolls, sides)) = parse_ndn(input.trim()).ok()?;

    if rolls == 0 || sides == 0 {
        return None;
    }

    Some(DiceSpec { rolls, sides })
}

pub fn roll(spec: DiceSpec, rng: &mut impl Rng) -> Vec<u32> {
    (0..spec.rolls)
        .map(|_| rng.gen_range(1..=spec.sides))
        .collect()
}

pub fn format_rolls(rolls: &[u32]) -> String {
    rolls.iter().join(", ")
}
