// 🍀 Lucky Numbers & Colors
// Fixed lookup keyed by Life Path (1-9, 11, 22, 33)

/// (life path, lucky numbers, lucky colors)
static LUCKY_TABLE: [(u32, &[u32], &[&str]); 12] = [
    (1, &[1, 10, 19, 28], &["Red", "Orange", "Gold"]),
    (2, &[2, 11, 20, 29], &["Green", "Cream", "White"]),
    (3, &[3, 12, 21, 30], &["Yellow", "Purple", "Pink"]),
    (4, &[4, 13, 22, 31], &["Blue", "Gray", "Green"]),
    (5, &[5, 14, 23], &["Turquoise", "Light Gray", "Silver"]),
    (6, &[6, 15, 24, 33], &["Pink", "Blue", "Indigo"]),
    (7, &[7, 16, 25], &["Violet", "Purple", "Sea Green"]),
    (8, &[8, 17, 26], &["Black", "Dark Blue", "Brown"]),
    (9, &[9, 18, 27], &["Red", "Crimson", "Gold"]),
    (11, &[11, 29, 38, 47], &["White", "Silver", "Pale Yellow"]),
    (22, &[22, 4, 13, 31], &["Coral", "Cream", "Gold"]),
    (33, &[33, 6, 15, 24], &["Turquoise", "Sea Green", "White"]),
];

const FALLBACK_COLOR: &str = "White";

fn entry(life_path: u32) -> Option<&'static (u32, &'static [u32], &'static [&'static str])> {
    LUCKY_TABLE.iter().find(|(key, _, _)| *key == life_path)
}

/// Lucky numbers for a Life Path; unknown values give `[life_path]`
pub fn lucky_numbers(life_path: u32) -> Vec<u32> {
    entry(life_path)
        .map(|(_, numbers, _)| numbers.to_vec())
        .unwrap_or_else(|| vec![life_path])
}

/// Lucky colors for a Life Path; unknown values give `["White"]`
pub fn lucky_colors(life_path: u32) -> Vec<String> {
    entry(life_path)
        .map(|(_, _, colors)| colors.iter().map(|c| c.to_string()).collect())
        .unwrap_or_else(|| vec![FALLBACK_COLOR.to_string()])
}
