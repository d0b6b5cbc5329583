// ============================================================================
// Formatage des montants
// ============================================================================
// Politique fixe, indépendante de la locale du système :
// - séparateur de milliers : virgule
// - séparateur décimal : point
// - USD : 2 décimales, préfixe "$"
// - quantités : 8 décimales, sans symbole monétaire
// ============================================================================

/// Décimales des montants en dollars
pub const USD_DECIMALS: usize = 2;

/// Décimales des quantités détenues
pub const AMOUNT_DECIMALS: usize = 8;

/// Formate un montant en dollars : 50000.0 -> "$50,000.00"
pub fn usd(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }

    let (negative, digits) = grouped_fixed(value, USD_DECIMALS);
    if negative {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

/// Formate une quantité : 1234.5 -> "1,234.50000000"
pub fn amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let (negative, digits) = grouped_fixed(value, AMOUNT_DECIMALS);
    if negative {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Arrondit à `decimals` chiffres et groupe la partie entière
///
/// Retourne (négatif, chiffres sans signe). Un nombre négatif qui
/// s'arrondit à zéro n'est pas signé.
fn grouped_fixed(value: f64, decimals: usize) -> (bool, String) {
    let (integer, fraction) = round_half_up(value.abs(), decimals);

    let is_zero = integer.chars().chain(fraction.chars()).all(|c| c == '0');
    let negative = value.is_sign_negative() && !is_zero;

    let mut digits = group_thousands(&integer);
    if !fraction.is_empty() {
        digits.push('.');
        digits.push_str(&fraction);
    }
    (negative, digits)
}

/// Arrondi décimal, demi vers le haut
///
/// Part de l'écriture décimale la plus courte du f64 (0.125 -> "0.125")
/// et non de sa valeur binaire exacte : 1.005 donne "1.01".
/// Retourne (partie entière, `decimals` chiffres de fraction).
fn round_half_up(value: f64, decimals: usize) -> (String, String) {
    let shortest = value.to_string();
    let (integer, fraction) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = integer.bytes().collect();
    digits.extend(fraction.bytes().chain(std::iter::repeat(b'0')).take(decimals));

    if fraction.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let to_string = |bytes: &[u8]| bytes.iter().map(|&b| b as char).collect::<String>();
    (to_string(&digits[..split]), to_string(&digits[split..]))
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
