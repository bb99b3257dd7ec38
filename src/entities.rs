//! The named character reference table and its longest-prefix-match lookup.
//!
//! The full WHATWG table has well over two thousand entries; this ships a representative subset
//! covering the legacy (no-trailing-semicolon) references plus the common symbolic and Greek
//! letter references, which is enough to exercise every branch of the named-character-reference
//! algorithm, including the case where a shorter legacy match (`not`) is a strict prefix of a
//! longer one (`notin;`).
//!
//! Consumers needing full coverage can supply their own `Emitter` and bypass this table
//! entirely.

/// One row of the named character reference table.
pub(crate) struct Entity {
    /// The name as it appears after `&`, including the trailing `;` when the reference requires
    /// one.
    pub(crate) name: &'static str,
    /// The replacement text: one scalar value, or two for a handful of legacy compatibility
    /// entries.
    pub(crate) characters: &'static str,
}

/// Upper bound on any entry's `name` length, used to bound how far the tokenizer peeks ahead
/// before attempting a match.
pub(crate) const MAX_ENTITY_NAME_LEN: usize = 32;

/// Find the longest table entry whose name is a prefix of `candidate`.
///
/// `candidate` is everything after the `&` that has been consumed or peeked so far. Per the
/// state machine, ties always go to the longest match (`notin;` over `not`).
pub(crate) fn longest_prefix_match(candidate: &str) -> Option<&'static Entity> {
    let mut best: Option<&'static Entity> = None;
    for entity in ENTITIES {
        if candidate.starts_with(entity.name) {
            if best.map_or(true, |b| entity.name.len() > b.name.len()) {
                best = Some(entity);
            }
        }
    }
    best
}

macro_rules! entities {
    ($(($name:literal, $chars:literal),)*) => {
        pub(crate) static ENTITIES: &[Entity] = &[
            $( Entity { name: $name, characters: $chars }, )*
        ];
    };
}

entities! {
    ("AElig;", "\u{00C6}"), ("AElig", "\u{00C6}"),
    ("AMP;", "&"), ("AMP", "&"),
    ("Aacute;", "\u{00C1}"), ("Aacute", "\u{00C1}"),
    ("Acirc;", "\u{00C2}"), ("Acirc", "\u{00C2}"),
    ("Agrave;", "\u{00C0}"), ("Agrave", "\u{00C0}"),
    ("Aring;", "\u{00C5}"), ("Aring", "\u{00C5}"),
    ("Atilde;", "\u{00C3}"), ("Atilde", "\u{00C3}"),
    ("Auml;", "\u{00C4}"), ("Auml", "\u{00C4}"),
    ("COPY;", "\u{00A9}"), ("COPY", "\u{00A9}"),
    ("Ccedil;", "\u{00C7}"), ("Ccedil", "\u{00C7}"),
    ("ETH;", "\u{00D0}"), ("ETH", "\u{00D0}"),
    ("Eacute;", "\u{00C9}"), ("Eacute", "\u{00C9}"),
    ("Ecirc;", "\u{00CA}"), ("Ecirc", "\u{00CA}"),
    ("Egrave;", "\u{00C8}"), ("Egrave", "\u{00C8}"),
    ("Euml;", "\u{00CB}"), ("Euml", "\u{00CB}"),
    ("GT;", ">"), ("GT", ">"),
    ("Iacute;", "\u{00CD}"), ("Iacute", "\u{00CD}"),
    ("Icirc;", "\u{00CE}"), ("Icirc", "\u{00CE}"),
    ("Igrave;", "\u{00CC}"), ("Igrave", "\u{00CC}"),
    ("Iuml;", "\u{00CF}"), ("Iuml", "\u{00CF}"),
    ("LT;", "<"), ("LT", "<"),
    ("Ntilde;", "\u{00D1}"), ("Ntilde", "\u{00D1}"),
    ("Oacute;", "\u{00D3}"), ("Oacute", "\u{00D3}"),
    ("Ocirc;", "\u{00D4}"), ("Ocirc", "\u{00D4}"),
    ("Ograve;", "\u{00D2}"), ("Ograve", "\u{00D2}"),
    ("Oslash;", "\u{00D8}"), ("Oslash", "\u{00D8}"),
    ("Otilde;", "\u{00D5}"), ("Otilde", "\u{00D5}"),
    ("Ouml;", "\u{00D6}"), ("Ouml", "\u{00D6}"),
    ("QUOT;", "\""), ("QUOT", "\""),
    ("REG;", "\u{00AE}"), ("REG", "\u{00AE}"),
    ("THORN;", "\u{00DE}"), ("THORN", "\u{00DE}"),
    ("Uacute;", "\u{00DA}"), ("Uacute", "\u{00DA}"),
    ("Ucirc;", "\u{00DB}"), ("Ucirc", "\u{00DB}"),
    ("Ugrave;", "\u{00D9}"), ("Ugrave", "\u{00D9}"),
    ("Uuml;", "\u{00DC}"), ("Uuml", "\u{00DC}"),
    ("Yacute;", "\u{00DD}"), ("Yacute", "\u{00DD}"),
    ("aacute;", "\u{00E1}"), ("aacute", "\u{00E1}"),
    ("acirc;", "\u{00E2}"), ("acirc", "\u{00E2}"),
    ("acute;", "\u{00B4}"), ("acute", "\u{00B4}"),
    ("aelig;", "\u{00E6}"), ("aelig", "\u{00E6}"),
    ("agrave;", "\u{00E0}"), ("agrave", "\u{00E0}"),
    ("amp;", "&"), ("amp", "&"),
    ("apos;", "'"),
    ("aring;", "\u{00E5}"), ("aring", "\u{00E5}"),
    ("atilde;", "\u{00E3}"), ("atilde", "\u{00E3}"),
    ("auml;", "\u{00E4}"), ("auml", "\u{00E4}"),
    ("brvbar;", "\u{00A6}"), ("brvbar", "\u{00A6}"),
    ("ccedil;", "\u{00E7}"), ("ccedil", "\u{00E7}"),
    ("cedil;", "\u{00B8}"), ("cedil", "\u{00B8}"),
    ("cent;", "\u{00A2}"), ("cent", "\u{00A2}"),
    ("copy;", "\u{00A9}"), ("copy", "\u{00A9}"),
    ("curren;", "\u{00A4}"), ("curren", "\u{00A4}"),
    ("deg;", "\u{00B0}"), ("deg", "\u{00B0}"),
    ("divide;", "\u{00F7}"), ("divide", "\u{00F7}"),
    ("eacute;", "\u{00E9}"), ("eacute", "\u{00E9}"),
    ("ecirc;", "\u{00EA}"), ("ecirc", "\u{00EA}"),
    ("egrave;", "\u{00E8}"), ("egrave", "\u{00E8}"),
    ("eth;", "\u{00F0}"), ("eth", "\u{00F0}"),
    ("euml;", "\u{00EB}"), ("euml", "\u{00EB}"),
    ("frac12;", "\u{00BD}"), ("frac12", "\u{00BD}"),
    ("frac14;", "\u{00BC}"), ("frac14", "\u{00BC}"),
    ("frac34;", "\u{00BE}"), ("frac34", "\u{00BE}"),
    ("gt;", ">"), ("gt", ">"),
    ("iacute;", "\u{00ED}"), ("iacute", "\u{00ED}"),
    ("icirc;", "\u{00EE}"), ("icirc", "\u{00EE}"),
    ("iexcl;", "\u{00A1}"), ("iexcl", "\u{00A1}"),
    ("igrave;", "\u{00EC}"), ("igrave", "\u{00EC}"),
    ("iquest;", "\u{00BF}"), ("iquest", "\u{00BF}"),
    ("iuml;", "\u{00EF}"), ("iuml", "\u{00EF}"),
    ("laquo;", "\u{00AB}"), ("laquo", "\u{00AB}"),
    ("lt;", "<"), ("lt", "<"),
    ("macr;", "\u{00AF}"), ("macr", "\u{00AF}"),
    ("micro;", "\u{00B5}"), ("micro", "\u{00B5}"),
    ("middot;", "\u{00B7}"), ("middot", "\u{00B7}"),
    ("nbsp;", "\u{00A0}"), ("nbsp", "\u{00A0}"),
    ("not;", "\u{00AC}"), ("not", "\u{00AC}"),
    ("notin;", "\u{2209}"),
    ("ntilde;", "\u{00F1}"), ("ntilde", "\u{00F1}"),
    ("oacute;", "\u{00F3}"), ("oacute", "\u{00F3}"),
    ("ocirc;", "\u{00F4}"), ("ocirc", "\u{00F4}"),
    ("ograve;", "\u{00F2}"), ("ograve", "\u{00F2}"),
    ("ordf;", "\u{00AA}"), ("ordf", "\u{00AA}"),
    ("ordm;", "\u{00BA}"), ("ordm", "\u{00BA}"),
    ("oslash;", "\u{00F8}"), ("oslash", "\u{00F8}"),
    ("otilde;", "\u{00F5}"), ("otilde", "\u{00F5}"),
    ("ouml;", "\u{00F6}"), ("ouml", "\u{00F6}"),
    ("para;", "\u{00B6}"), ("para", "\u{00B6}"),
    ("plusmn;", "\u{00B1}"), ("plusmn", "\u{00B1}"),
    ("pound;", "\u{00A3}"), ("pound", "\u{00A3}"),
    ("quot;", "\""), ("quot", "\""),
    ("raquo;", "\u{00BB}"), ("raquo", "\u{00BB}"),
    ("reg;", "\u{00AE}"), ("reg", "\u{00AE}"),
    ("sect;", "\u{00A7}"), ("sect", "\u{00A7}"),
    ("shy;", "\u{00AD}"), ("shy", "\u{00AD}"),
    ("sup1;", "\u{00B9}"), ("sup1", "\u{00B9}"),
    ("sup2;", "\u{00B2}"), ("sup2", "\u{00B2}"),
    ("sup3;", "\u{00B3}"), ("sup3", "\u{00B3}"),
    ("szlig;", "\u{00DF}"), ("szlig", "\u{00DF}"),
    ("thorn;", "\u{00FE}"), ("thorn", "\u{00FE}"),
    ("times;", "\u{00D7}"), ("times", "\u{00D7}"),
    ("uacute;", "\u{00FA}"), ("uacute", "\u{00FA}"),
    ("ucirc;", "\u{00FB}"), ("ucirc", "\u{00FB}"),
    ("ugrave;", "\u{00F9}"), ("ugrave", "\u{00F9}"),
    ("uml;", "\u{00A8}"), ("uml", "\u{00A8}"),
    ("uuml;", "\u{00FC}"), ("uuml", "\u{00FC}"),
    ("yacute;", "\u{00FD}"), ("yacute", "\u{00FD}"),
    ("yen;", "\u{00A5}"), ("yen", "\u{00A5}"),
    ("yuml;", "\u{00FF}"), ("yuml", "\u{00FF}"),
    ("trade;", "\u{2122}"),
    ("hellip;", "\u{2026}"),
    ("mdash;", "\u{2014}"),
    ("ndash;", "\u{2013}"),
    ("lsquo;", "\u{2018}"),
    ("rsquo;", "\u{2019}"),
    ("ldquo;", "\u{201C}"),
    ("rdquo;", "\u{201D}"),
    ("bull;", "\u{2022}"),
    ("dagger;", "\u{2020}"),
    ("Dagger;", "\u{2021}"),
    ("permil;", "\u{2030}"),
    ("lsaquo;", "\u{2039}"),
    ("rsaquo;", "\u{203A}"),
    ("euro;", "\u{20AC}"),
    ("larr;", "\u{2190}"),
    ("uarr;", "\u{2191}"),
    ("rarr;", "\u{2192}"),
    ("darr;", "\u{2193}"),
    ("harr;", "\u{2194}"),
    ("spades;", "\u{2660}"),
    ("clubs;", "\u{2663}"),
    ("hearts;", "\u{2665}"),
    ("diams;", "\u{2666}"),
    ("infin;", "\u{221E}"),
    ("ne;", "\u{2260}"),
    ("le;", "\u{2264}"),
    ("ge;", "\u{2265}"),
    ("forall;", "\u{2200}"),
    ("part;", "\u{2202}"),
    ("exist;", "\u{2203}"),
    ("empty;", "\u{2205}"),
    ("nabla;", "\u{2207}"),
    ("isin;", "\u{2208}"),
    ("sum;", "\u{2211}"),
    ("prod;", "\u{220F}"),
    ("radic;", "\u{221A}"),
    ("prop;", "\u{221D}"),
    ("ang;", "\u{2220}"),
    ("and;", "\u{2227}"),
    ("or;", "\u{2228}"),
    ("cap;", "\u{2229}"),
    ("cup;", "\u{222A}"),
    ("int;", "\u{222B}"),
    ("there4;", "\u{2234}"),
    ("sim;", "\u{223C}"),
    ("cong;", "\u{2245}"),
    ("asymp;", "\u{2248}"),
    ("equiv;", "\u{2261}"),
    ("sub;", "\u{2282}"),
    ("sup;", "\u{2283}"),
    ("nsub;", "\u{2284}"),
    ("sube;", "\u{2286}"),
    ("supe;", "\u{2287}"),
    ("oplus;", "\u{2295}"),
    ("otimes;", "\u{2297}"),
    ("perp;", "\u{22A5}"),
    ("sdot;", "\u{22C5}"),
    ("alpha;", "\u{03B1}"),
    ("beta;", "\u{03B2}"),
    ("gamma;", "\u{03B3}"),
    ("delta;", "\u{03B4}"),
    ("epsilon;", "\u{03B5}"),
    ("zeta;", "\u{03B6}"),
    ("eta;", "\u{03B7}"),
    ("theta;", "\u{03B8}"),
    ("iota;", "\u{03B9}"),
    ("kappa;", "\u{03BA}"),
    ("lambda;", "\u{03BB}"),
    ("mu;", "\u{03BC}"),
    ("nu;", "\u{03BD}"),
    ("xi;", "\u{03BE}"),
    ("omicron;", "\u{03BF}"),
    ("pi;", "\u{03C0}"),
    ("rho;", "\u{03C1}"),
    ("sigma;", "\u{03C3}"),
    ("tau;", "\u{03C4}"),
    ("upsilon;", "\u{03C5}"),
    ("phi;", "\u{03C6}"),
    ("chi;", "\u{03C7}"),
    ("psi;", "\u{03C8}"),
    ("omega;", "\u{03C9}"),
    ("Alpha;", "\u{0391}"),
    ("Beta;", "\u{0392}"),
    ("Gamma;", "\u{0393}"),
    ("Delta;", "\u{0394}"),
    ("Epsilon;", "\u{0395}"),
    ("Zeta;", "\u{0396}"),
    ("Eta;", "\u{0397}"),
    ("Theta;", "\u{0398}"),
    ("Iota;", "\u{0399}"),
    ("Kappa;", "\u{039A}"),
    ("Lambda;", "\u{039B}"),
    ("Mu;", "\u{039C}"),
    ("Nu;", "\u{039D}"),
    ("Xi;", "\u{039E}"),
    ("Omicron;", "\u{039F}"),
    ("Pi;", "\u{03A0}"),
    ("Rho;", "\u{03A1}"),
    ("Sigma;", "\u{03A3}"),
    ("Tau;", "\u{03A4}"),
    ("Upsilon;", "\u{03A5}"),
    ("Phi;", "\u{03A6}"),
    ("Chi;", "\u{03A7}"),
    ("Psi;", "\u{03A8}"),
    ("Omega;", "\u{03A9}"),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_legacy_match_without_semicolon() {
        let m = longest_prefix_match("amp").unwrap();
        assert_eq!(m.name, "amp");
        assert_eq!(m.characters, "&");
    }

    #[test]
    fn longest_match_wins_over_shorter_prefix() {
        // "not" is itself a valid legacy entity, but "notin;" must win when present.
        let m = longest_prefix_match("notin;X").unwrap();
        assert_eq!(m.name, "notin;");
    }

    #[test]
    fn falls_back_to_shorter_match_when_longer_one_absent() {
        let m = longest_prefix_match("notX").unwrap();
        assert_eq!(m.name, "not");
    }

    #[test]
    fn unknown_name_matches_nothing() {
        assert!(longest_prefix_match("zzzznope;").is_none());
    }
}
