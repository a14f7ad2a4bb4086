//! Case-folding used by the `Query` parser mode (spec.md §4.2): alphabetic
//! code points fold via Unicode simple case folding (`char::to_lowercase`,
//! which already yields more than one output character for the handful of
//! code points whose lowercase form expands, e.g. U+0130). Numeric code
//! points that are themselves compatibility-decomposable (vulgar fractions,
//! superscript/subscript digits) decompose to their ASCII digit sequence —
//! spec.md's own example is "½" folding to '1', '⁄', '2'.

/// Append the folded form of `c` to `out`.
pub fn fold_into(c: char, out: &mut String) {
    if let Some(expansion) = numeric_compatibility_fold(c) {
        out.push_str(expansion);
        return;
    }
    for folded in c.to_lowercase() {
        out.push(folded);
    }
}

/// Compatibility decomposition for the numeric code points most likely to
/// appear in free text: vulgar fractions and superscript/subscript digits.
/// Not a full NFKD implementation — spec.md's Non-goals exempt this crate
/// from exact cross-implementation compatibility, only the shape of the
/// behaviour (one code point, many output characters) is load-bearing.
fn numeric_compatibility_fold(c: char) -> Option<&'static str> {
    Some(match c {
        '¼' => "1⁄4",
        '½' => "1⁄2",
        '¾' => "3⁄4",
        '⅐' => "1⁄7",
        '⅑' => "1⁄9",
        '⅒' => "1⁄10",
        '⅓' => "1⁄3",
        '⅔' => "2⁄3",
        '⅕' => "1⁄5",
        '⅖' => "2⁄5",
        '⅗' => "3⁄5",
        '⅘' => "4⁄5",
        '⅙' => "1⁄6",
        '⅚' => "5⁄6",
        '⅛' => "1⁄8",
        '⅜' => "3⁄8",
        '⅝' => "5⁄8",
        '⅞' => "7⁄8",
        '⁰' => "0",
        '¹' => "1",
        '²' => "2",
        '³' => "3",
        '⁴' => "4",
        '⁵' => "5",
        '⁶' => "6",
        '⁷' => "7",
        '⁸' => "8",
        '⁹' => "9",
        '₀' => "0",
        '₁' => "1",
        '₂' => "2",
        '₃' => "3",
        '₄' => "4",
        '₅' => "5",
        '₆' => "6",
        '₇' => "7",
        '₈' => "8",
        '₉' => "9",
        _ => return None,
    })
}
