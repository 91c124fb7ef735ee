//! The fixed instruction sent with every food photo.
//!
//! The model is asked for a layout, not bound to it. Whatever comes back is
//! displayed as-is.

/// Instruction text for the calorie analysis.
pub const ANALYSIS_PROMPT: &str = "\
Please analyze this food image and provide:
1. List each food item and its calories
2. Total calories
3. Simple health advice

Format like this:
FOOD ITEMS:
1. [Food Item] - [Calories]
2. [Food Item] - [Calories]

TOTAL CALORIES: [Number]

HEALTH TIPS:
\u{2022} [Tip 1]
\u{2022} [Tip 2]
";
