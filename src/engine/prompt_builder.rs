use crate::model::module::{ModuleType, ThemeDef};
use crate::model::profile::AgeRange;

/// Which JSON shape a prompt instructs the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    StoryQuestions,
    StoryWords,
    StoryPhonics,
}

impl ResponseShape {
    pub fn for_module(module: ModuleType) -> Self {
        match module {
            ModuleType::Spelling => ResponseShape::StoryWords,
            ModuleType::Phonics => ResponseShape::StoryPhonics,
            _ => ResponseShape::StoryQuestions,
        }
    }

    /// The output-format contract embedded verbatim in every prompt.
    fn contract(self) -> &'static str {
        match self {
            ResponseShape::StoryQuestions => STORY_QUESTIONS_CONTRACT,
            ResponseShape::StoryWords => STORY_WORDS_CONTRACT,
            ResponseShape::StoryPhonics => STORY_PHONICS_CONTRACT,
        }
    }
}

const STORY_QUESTIONS_CONTRACT: &str = "Please provide the output in a single, valid JSON object with two keys: \"story\" and \"questions\".\n\
- The \"story\" should be in Markdown format.\n\
- The \"questions\" should be an array of objects, where each object has \"question\", \"options\" (an array of 4 strings), and \"answer\" (the 0-based index of the correct option).";

const STORY_WORDS_CONTRACT: &str = "Please provide the output in a single, valid JSON object with two keys: \"story\" and \"words\".\n\
- The \"story\" should be a title in Markdown format.\n\
- The \"words\" should be an array of exactly 5 age-appropriate spelling words.";

const STORY_PHONICS_CONTRACT: &str = r###"Please provide the output in a single, valid JSON object with two keys: "story" and "questions".
- The "story" should be in Markdown format.
- The "questions" should be an array of objects, where each object has "question", "options" (an array of 4 strings), "answer" (the 0-based index of the correct option), and "speak" (the single letter, sound, or word to be spoken).

IMPORTANT: Return ONLY valid JSON. No additional text, explanations, or code blocks.

Example JSON format:
{
  "story": "## ABC Sound Party! 🎉\n\nLet's learn letter sounds together!",
  "questions": [
    {
      "question": "The letter 'B' makes a sound like a...",
      "options": ["Ball ⚽", "Cat 🐈", "Dog 🐕", "Fish 🐠"],
      "answer": 0,
      "speak": "buh"
    }
  ]
}"###;

/// How a template row is selected once the module matches.
enum Rule {
    AnyAge,
    Ages(&'static [AgeRange]),
    /// Phonics branches on the chosen theme id instead of the age bucket.
    Theme(&'static str),
}

/// One row of the template table: an age-appropriate task description (with
/// an `{age}` slot) plus guidance lines appended under the format contract.
struct Template {
    module: ModuleType,
    rule: Rule,
    task: &'static str,
    guidance: &'static [&'static str],
}

static TEMPLATES: &[Template] = &[
    // ---------- Math ----------
    Template {
        module: ModuleType::Math,
        rule: Rule::Ages(&[AgeRange::Toddler]),
        task: "Create a simple counting module for a toddler (age {age}).",
        guidance: &[
            "The \"story\" should be a very short title or a single sentence, like \"## Let's Count! 🔢\".",
            "The \"questions\" should be 3-4 simple questions about counting 1-5 objects, using emojis. Example: \"How many apples do you see? 🍎🍎\"",
        ],
    },
    Template {
        module: ModuleType::Math,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a basic addition and subtraction module for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## Math Adventure! ➕\".",
            "The \"questions\" should be 5-7 simple problems involving addition and subtraction up to 10. Example: \"3 + 4 = ?\"",
        ],
    },
    Template {
        module: ModuleType::Math,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a math module with multiplication and division for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## Brainy Math! 🧠\".",
            "The \"questions\" should be 5-7 problems including addition, subtraction, and simple multiplication/division. Example: \"4 x 5 = ?\"",
        ],
    },
    Template {
        module: ModuleType::Math,
        rule: Rule::Ages(&[AgeRange::Preteen, AgeRange::Teen]),
        task: "Create a math module with word problems for a pre-teen (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## Math Puzzles! 🧩\".",
            "The \"questions\" should be 5-7 problems including multi-step arithmetic and complex word problems. Example: \"If a train travels at 60 mph, how far does it go in 3 hours?\"",
        ],
    },
    // ---------- Logic ----------
    Template {
        module: ModuleType::Logic,
        rule: Rule::Ages(&[AgeRange::Toddler]),
        task: "Create a simple \"what comes next?\" sequencing module for a toddler (age {age}).",
        guidance: &[
            "The \"story\" should be a very short title or a single sentence, like \"## What's Next? 🤔\".",
            "The \"questions\" should be 3-4 simple questions about daily routines or simple patterns using emojis. Example: \"First you wake up 🛌, then you eat breakfast 🥞. What's next?\", with options like \"Go to sleep 😴\", \"Brush your teeth 😁\", \"Play with toys 🧸\".",
        ],
    },
    Template {
        module: ModuleType::Logic,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a \"sequence of events\" logic module for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## Order the Story! 📜\".",
            "The \"questions\" should present a simple 3-step story (e.g., planting a seed) and ask the child to identify the first, middle, or last step. Example: \"To make a sandwich, what is the FIRST step?\", with options like \"Eat the sandwich\", \"Put jelly on bread\", \"Get two slices of bread\".",
        ],
    },
    Template {
        module: ModuleType::Logic,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a basic \"if-then\" conditional logic module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## If This, Then That! 🤖\".",
            "The \"questions\" should be 4-6 more complex conditional scenarios. Example: \"IF it is raining outside, THEN you should bring...\", with options like \"A kite\", \"Sunglasses\", \"An umbrella\", \"A bucket\".",
        ],
    },
    Template {
        module: ModuleType::Logic,
        rule: Rule::Ages(&[AgeRange::Preteen, AgeRange::Teen]),
        task: "Create a simple \"algorithmic thinking\" module for a pre-teen (age {age}).",
        guidance: &[
            "The \"story\" should be a short title or a single sentence, like \"## Plan the Steps! 🗺️\".",
            "The \"questions\" should be 4-6 challenging problems that require breaking down a task into a logical sequence of steps. Example: \"You want to make a robot draw a square. What is the correct sequence of commands?\", with options showing different orders of 'pen down', 'move forward', 'turn right', 'pen up'.",
        ],
    },
    // ---------- Reading ----------
    Template {
        module: ModuleType::Reading,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a short story comprehension module for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a very short, simple paragraph with a clear narrative.",
            "The \"questions\" should be 3-5 questions about the main characters and events in the story.",
        ],
    },
    Template {
        module: ModuleType::Reading,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a reading comprehension module with a focus on vocabulary for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a short paragraph with some more complex words.",
            "The \"questions\" should be 4-6 questions. They should test comprehension and ask about the meaning of one or two words from the story.",
        ],
    },
    // ---------- Rhyming ----------
    Template {
        module: ModuleType::Rhyming,
        rule: Rule::AnyAge,
        task: "Create a rhyming words module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Rhyme Time! 🎤\".",
            "The \"questions\" should be 5-7 questions asking to find a word that rhymes with a given word. Example: \"Which word rhymes with 'cat'?\", with options like \"hat\", \"dog\", \"sun\".",
        ],
    },
    // ---------- Spelling ----------
    Template {
        module: ModuleType::Spelling,
        rule: Rule::AnyAge,
        task: "Create a spelling bee module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Spelling Bee! 🐝\".",
        ],
    },
    // ---------- Emoji riddles ----------
    Template {
        module: ModuleType::EmojiRiddles,
        rule: Rule::AnyAge,
        task: "Create an emoji riddles module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Emoji Riddles! 🤔\".",
            "The \"questions\" should be 5-7 riddles made of emojis. The answer should be a common object or animal. Example: \"I am yellow, I grow on trees, and monkeys love me. 🍌\", with the question \"What am I?\".",
        ],
    },
    // ---------- Coding ----------
    Template {
        module: ModuleType::Coding,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a very simple, visual coding logic module for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Tell the Robot What to Do! 🤖\".",
            "The \"questions\" should be 4-5 questions about sequencing simple, real-world tasks. Use emojis heavily. Example: \"To get a glass of juice, what is the FIRST step?\", with options like \"Drink the juice 🧃\", \"Pour the juice 🫗\", \"Get a cup 🥛\".",
        ],
    },
    Template {
        module: ModuleType::Coding,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a basic coding concepts module for a child (age {age}) using analogies.",
        guidance: &[
            "The \"story\" should be a title like \"## Code Puzzles! 🧩\".",
            "The \"questions\" should be 5-6 questions explaining concepts like 'if/then' statements and 'loops' with simple stories. Example: \"IF it's your birthday, THEN you get presents. It's your birthday today! What happens?\", with options like \"You give presents\", \"You get presents\", \"Nothing happens\".",
        ],
    },
    Template {
        module: ModuleType::Coding,
        rule: Rule::Ages(&[AgeRange::Preteen, AgeRange::Teen]),
        task: "Create a language-independent coding concepts module for a child aged {age}.",
        guidance: &[
            "The \"story\" should be a title like \"## Code Breakers! 💻\".",
            "The \"questions\" should be 5-7 questions about fundamental programming concepts like loops, conditionals, variables, and functions, using pseudocode or real-world analogies. Example: \"A 'loop' in coding is like...\", with options like \"A straight line\", \"Doing something once\", \"Repeating an action\", \"A type of variable\".",
        ],
    },
    // ---------- AI ----------
    Template {
        module: ModuleType::Ai,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a very simple \"what is AI?\" module for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Smart Helpers! 🤖\".",
            "The \"questions\" should be 4-5 questions using analogies to things they know. Example: \"Which of these is like a smart helper that can learn?\", with options like \"A smart speaker that plays music you like\", \"A teddy bear\", \"A bicycle\".",
        ],
    },
    Template {
        module: ModuleType::Ai,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a basic AI concepts module for a child (age {age}) explaining how AI learns.",
        guidance: &[
            "The \"story\" should be a title like \"## How Do Computers Learn? 🤔\".",
            "The \"questions\" should be 5-6 questions using simple examples. Example: \"You show a computer many pictures of cats to teach it. This is called...\", with options like \"Guessing\", \"Training\", \"Drawing\", \"Playing\".",
        ],
    },
    Template {
        module: ModuleType::Ai,
        rule: Rule::Ages(&[AgeRange::Preteen, AgeRange::Teen]),
        task: "Create an introductory module on different types of AI for a child aged {age}.",
        guidance: &[
            "The \"story\" should be a title like \"## Exploring AI Worlds! 🌍\".",
            "The \"questions\" should be 5-7 questions about different AI applications. Example: \"An AI that can understand and translate languages is a type of...\", with options like \"Image Recognition AI\", \"Game Playing AI\", \"Natural Language Processing AI\", \"Self-Driving Car AI\".",
        ],
    },
    // ---------- Science ----------
    Template {
        module: ModuleType::Science,
        rule: Rule::Ages(&[AgeRange::Preschool]),
        task: "Create a simple science module about the natural world for a young child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Nature Detectives! 🌳\".",
            "The \"questions\" should be 4-5 questions about basic concepts like weather, plants, or animals. Example: \"What do plants need to grow?\", with options like \"Sunlight and water\", \"Cookies and milk\", \"Toys and books\".",
        ],
    },
    Template {
        module: ModuleType::Science,
        rule: Rule::Ages(&[AgeRange::School]),
        task: "Create a basic STEM concepts module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Fun Experiments! 🧪\".",
            "The \"questions\" should be 5-6 questions about simple physics or biology. Example: \"What happens to water when it gets very cold?\", with options like \"It turns to steam\", \"It turns to ice\", \"It disappears\".",
        ],
    },
    Template {
        module: ModuleType::Science,
        rule: Rule::Ages(&[AgeRange::Preteen, AgeRange::Teen]),
        task: "Create an introductory module on a core science topic for a child aged {age}.",
        guidance: &[
            "The \"story\" should be a title like \"## Science Investigators! 🔬\".",
            "The \"questions\" should be 5-7 questions about topics like the solar system, basic chemistry, or the scientific method. Example: \"What is the force that keeps us on the ground?\", with options like \"Magnetism\", \"Gravity\", \"Friction\", \"Electricity\".",
        ],
    },
    // ---------- Phonics (selected by theme, not age) ----------
    Template {
        module: ModuleType::Phonics,
        rule: Rule::Theme("abc"),
        task: "Create a \"letter sounds\" module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## ABC Sound Party! 🎉\".",
            "The \"questions\" should be 5-7 questions asking for the sound a letter makes. Use emojis.",
            "The \"speak\" field is crucial: it must contain the common phonetic sound of the letter, not the letter's name.",
            "Example Question: \"The letter 'C' makes a sound like a...\" with options like \"Cat 🐈\", \"Dog 🐕\", \"Bird 🐦\".",
            "For this example, the \"speak\" field must be \"kuh\" (the sound of 'c' in 'cat'), NOT \"cee\".",
            "Another example: For the letter 'A', the \"speak\" field should be \"ah\" as in 'apple'.",
        ],
    },
    Template {
        module: ModuleType::Phonics,
        rule: Rule::Theme("words"),
        task: "Create a \"blending sounds\" phonics module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Let's Make Words! 🧩\".",
            "The \"questions\" should be 5-7 questions asking the child to blend simple CVC (consonant-vowel-consonant) words. Example: \"What word do the sounds /c/ /a/ /t/ make?\", with options like \"mat\", \"cat\", \"bat\". The \"speak\" field should contain the word, e.g., \"cat\".",
        ],
    },
    Template {
        module: ModuleType::Phonics,
        rule: Rule::Theme("digraphs"),
        task: "Create a phonics module on \"digraphs\" (like sh, ch, th) for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Super Sounds! 🦸\".",
            "The \"questions\" should be 5-7 questions asking to identify words with specific digraphs.",
            "The \"speak\" field is crucial: it must contain the blended sound of the digraph, not the individual letters.",
            "Example Question: \"Which of these words has the 'sh' sound?\", with options like \"ship\", \"chair\", \"thumb\".",
            "For this example, the \"speak\" field must be \"shhh\", NOT \"s\" and \"h\".",
            "Another example: For 'th', the \"speak\" field should be \"the\".",
        ],
    },
    Template {
        module: ModuleType::Phonics,
        rule: Rule::Theme("vowel-teams"),
        task: "Create a phonics module on \"vowel teams\" (like ae, ai, ea, ee, oa, ou) for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Vowel Teams! 👥\".",
            "The \"questions\" should be 5-7 questions asking to identify words with vowel teams or choose the correct vowel team sound.",
            "The \"speak\" field should contain the vowel team sound (like \"ay\" for 'ai', \"ee\" for 'ea').",
            "Example Question: \"Which word has the 'ai' sound like in 'rain'?\", with options like \"pain\", \"pen\", \"pin\", \"pan\".",
            "For this example, the \"speak\" field should be \"ay\" (the long 'a' sound).",
            "Focus on common vowel teams: ai/ay (long a), ea/ee (long e), oa/ow (long o), ou/ow (ou sound).",
        ],
    },
    Template {
        module: ModuleType::Phonics,
        rule: Rule::Theme("blends"),
        task: "Create a phonics module on \"consonant blends\" (like bl, cl, fl, sl, br, cr, dr, fr, gr, pr, tr, st, sp, sk) for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Blending Sounds! 🌟\".",
            "The \"questions\" should be 5-7 questions asking to identify words that start with specific blends.",
            "The \"speak\" field should contain the blended consonant sound (like \"bl\" for blend, \"st\" for stop).",
            "Example Question: \"Which word starts with the 'bl' blend?\", with options like \"blue\", \"bus\", \"cat\", \"dog\".",
            "For this example, the \"speak\" field should be \"bl\" (both consonants blended together).",
            "Focus on common initial blends: bl, cl, fl, sl (l-blends), br, cr, dr, fr, gr, pr, tr (r-blends), st, sp, sk, sm, sn (s-blends).",
        ],
    },
    // Fallback when the chosen phonics theme has no dedicated row.
    Template {
        module: ModuleType::Phonics,
        rule: Rule::AnyAge,
        task: "Create a basic phonics module for a child (age {age}).",
        guidance: &[
            "The \"story\" should be a title like \"## Phonics Fun! 🎵\".",
            "The \"questions\" should be 5-7 basic phonics questions appropriate for the age.",
            "Include the \"speak\" field with the appropriate sound for each question.",
        ],
    },
];

/// Build the full prompt for one generation request, or `""` when the
/// module is not offered for this age. An empty return is the "no content"
/// signal, not an error, and must never be sent to the API.
pub fn build_prompt(
    age: u8,
    module: ModuleType,
    theme: Option<&ThemeDef>,
    difficulty: u8,
) -> String {
    if !module.is_available(age) {
        return String::new();
    }
    let Some(range) = AgeRange::from_age(age) else {
        return String::new();
    };

    let template = TEMPLATES.iter().find(|t| {
        t.module == module
            && match t.rule {
                Rule::AnyAge => true,
                Rule::Ages(ranges) => ranges.contains(&range),
                Rule::Theme(id) => theme.map_or(false, |th| th.id == id),
            }
    });
    let Some(template) = template else {
        return String::new();
    };

    let shape = ResponseShape::for_module(module);
    let mut prompt = String::new();

    prompt.push_str(&template.task.replace("{age}", &age.to_string()));
    // Phonics themes pick the template above; everywhere else the theme is
    // a cosmetic instruction woven into the text.
    if shape != ResponseShape::StoryPhonics {
        if let Some(theme) = theme {
            prompt.push_str(&format!(
                " The theme for the content should be: {}.",
                theme.name
            ));
        }
    }
    prompt.push_str(&format!(
        " The difficulty level should be {} out of 5.",
        difficulty
    ));
    prompt.push('\n');
    prompt.push_str(shape.contract());
    prompt.push('\n');
    for line in template.guidance {
        prompt.push_str("- ");
        prompt.push_str(line);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::themes_for;

    #[test]
    fn empty_prompt_exactly_when_module_is_unavailable() {
        for module in ModuleType::ALL {
            for age in 1..=15u8 {
                let theme = themes_for(module).first();
                let prompt = build_prompt(age, module, theme, 3);
                assert_eq!(
                    prompt.is_empty(),
                    !module.is_available(age),
                    "{module:?} at age {age}"
                );
            }
        }
    }

    #[test]
    fn prompts_embed_the_json_contract_for_their_shape() {
        let math = build_prompt(8, ModuleType::Math, None, 3);
        assert!(math.contains("single, valid JSON object"));
        assert!(math.contains("\"story\" and \"questions\""));
        assert!(math.contains("an array of 4 strings"));

        let spelling = build_prompt(11, ModuleType::Spelling, None, 3);
        assert!(spelling.contains("\"story\" and \"words\""));
        assert!(spelling.contains("exactly 5 age-appropriate spelling words"));

        let theme = ThemeDef { id: "abc", name: "Letter Sounds" };
        let phonics = build_prompt(5, ModuleType::Phonics, Some(&theme), 3);
        assert!(phonics.contains("\"speak\""));
        assert!(phonics.contains("Return ONLY valid JSON"));
    }

    #[test]
    fn school_age_math_covers_multiplication_and_division() {
        let prompt = build_prompt(8, ModuleType::Math, None, 3);
        assert!(prompt.contains("multiplication and division"));
        assert!(prompt.contains("(age 8)"));
    }

    #[test]
    fn theme_and_difficulty_are_substituted() {
        let theme = ThemeDef { id: "space", name: "Outer Space" };
        let prompt = build_prompt(6, ModuleType::Math, Some(&theme), 4);
        assert!(prompt.contains("The theme for the content should be: Outer Space."));
        assert!(prompt.contains("The difficulty level should be 4 out of 5."));
    }

    #[test]
    fn phonics_branches_on_theme_id() {
        let digraphs = ThemeDef { id: "digraphs", name: "Super Sounds" };
        let prompt = build_prompt(6, ModuleType::Phonics, Some(&digraphs), 2);
        assert!(prompt.contains("digraphs"));
        assert!(prompt.contains("\"shhh\""));
        // The theme name is not injected as a cosmetic instruction.
        assert!(!prompt.contains("The theme for the content should be"));

        // Unknown theme ids fall back to the generic phonics template.
        let unknown = ThemeDef { id: "mystery", name: "Mystery" };
        let fallback = build_prompt(6, ModuleType::Phonics, Some(&unknown), 2);
        assert!(fallback.contains("basic phonics module"));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let theme = ThemeDef { id: "ocean", name: "Under the Sea" };
        let a = build_prompt(9, ModuleType::Science, Some(&theme), 5);
        let b = build_prompt(9, ModuleType::Science, Some(&theme), 5);
        assert_eq!(a, b);
    }

    #[test]
    fn toddler_logic_uses_the_sequencing_template() {
        let prompt = build_prompt(2, ModuleType::Logic, None, 1);
        assert!(prompt.contains("what comes next?"));
        assert!(prompt.contains("3-4 simple questions"));
    }
}
