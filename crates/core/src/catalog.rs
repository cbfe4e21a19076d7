//! Built-in question set used when no generator is configured.
//!
//! A ten-question primary-school quiz themed around dogs, spanning English,
//! Maths, Science, History, Art & Design and Music.

use crate::model::{Question, QuestionDraft};

/// Prompt shown with the results screen, answered in free text.
pub const BONUS_CHALLENGE: &str = "If you could design the most amazing, super-fun dog park in the \
world, what exciting things would it have for all the cute pups?";

fn drafts() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::new(
            "Your dog, Waffle, just did an amazing trick! You want to write about it with lots of \
             excitement. Which punctuation mark is missing from this sentence? 'Waffle did it Wow'",
            [", (Comma)", ". (Full stop)", "! (Exclamation mark)", "? (Question mark)"],
            "! (Exclamation mark)",
            "English",
        ),
        QuestionDraft::new(
            "If you're drawing a cozy dog bed that's shaped like a perfect square, how many equal \
             sides does a square have? 🐶",
            ["Two", "Three", "Four", "Five"],
            "Four",
            "Maths",
        ),
        QuestionDraft::new(
            "When your dog jumps up high to catch a bouncy ball, which natural force makes the ball \
             (and your dog!) come back down to the ground? 💪",
            ["Magnetism", "Friction", "Gravity", "Lift"],
            "Gravity",
            "Science",
        ),
        QuestionDraft::new(
            "Long, long ago, in Ancient Egypt, people loved their dogs so much that they sometimes \
             buried them with their owners! Which of these were the powerful rulers of Ancient \
             Egypt? 👑",
            ["Knights", "Vikings", "Pharaohs", "Cowboys"],
            "Pharaohs",
            "History",
        ),
        QuestionDraft::new(
            "You're drawing a beautiful Golden Retriever puppy! Which colours would you mostly use \
             for its soft, fluffy fur? 🎨",
            [
                "Reds, purples, and blues",
                "Yellows, golds, and light browns",
                "Greys, blacks, and whites",
                "Bright pinks and greens",
            ],
            "Yellows, golds, and light browns",
            "Art & Design",
        ),
        QuestionDraft::new(
            "You're making a happy song about your dog! What is the super catchy part of a song \
             that often repeats, and everyone can sing along to? 🎤",
            ["The bridge", "The verse", "The chorus", "The outro"],
            "The chorus",
            "Music",
        ),
        QuestionDraft::new(
            "Your tiny puppy, Pip, is so **adorable** when she sleeps in her basket. What does the \
             word 'adorable' mean? ✨",
            [
                "A bit grumpy",
                "Very cute and loveable",
                "Sleepy and quiet",
                "Big and noisy",
            ],
            "Very cute and loveable",
            "English",
        ),
        QuestionDraft::new(
            "Your dog's walking lead is 3 meters long. If you buy a new, longer lead that is 1.5 \
             meters *longer* than the old one, how long is the new lead? 🎀",
            ["1.5 meters", "3 meters", "4.5 meters", "5 meters"],
            "4.5 meters",
            "Maths",
        ),
        QuestionDraft::new(
            "What very important thing do all living creatures, like your dog, need to drink every \
             day to stay hydrated and healthy? 💧",
            ["Milk", "Juice", "Water", "Fizzy pop"],
            "Water",
            "Science",
        ),
        QuestionDraft::new(
            "Scientists believe that all of our cute, cuddly pet dogs today originally came from \
             which wild animal, thousands of years ago? 🐺",
            ["Bears", "Lions", "Wolves", "Cats"],
            "Wolves",
            "History",
        ),
    ]
}

/// The canned question list, in presentation order.
#[must_use]
pub fn canned_questions() -> Vec<Question> {
    drafts()
        .into_iter()
        .filter_map(|draft| draft.validate().ok())
        .collect()
}
