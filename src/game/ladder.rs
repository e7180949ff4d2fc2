/// Questions in a full game.
pub const GAME_LENGTH: usize = 15;

/// Prize for answering question `n` (1-based) correctly is `LADDER[n - 1]`.
pub const LADDER: [u32; GAME_LENGTH] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

/// Completed-question counts after which winnings are guaranteed.
pub const MILESTONES: [usize; 3] = [5, 10, 15];

/// Prize shown on the rung of the 0-based question `index`; 0 past the top.
pub fn prize_at(index: usize) -> u32 {
    LADDER.get(index).copied().unwrap_or(0)
}

/// Whether the 0-based question `index` sits on a milestone rung.
pub fn is_milestone(index: usize) -> bool {
    MILESTONES.contains(&(index + 1))
}

/// Money kept after `completed` correct answers followed by a wrong one.
pub fn guaranteed_prize(completed: usize) -> u32 {
    MILESTONES
        .iter()
        .rev()
        .find(|&&milestone| milestone <= completed)
        .map(|&milestone| prize_at(milestone - 1))
        .unwrap_or(0)
}

/// Render an amount as `$1,000,000`.
pub fn format_prize(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${}", grouped)
}
