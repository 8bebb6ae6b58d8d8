//! Prompt text for every provider call. Prior stage outputs are interpolated
//! verbatim.

use crate::design::DesignEntry;
use crate::objective::Objective;
use crate::stage::Refinable;
use crate::stories::UserStoryBatch;
use std::fmt::Write as _;

/// Numbered `title: description` lines.
pub fn objectives_list(objectives: &[Objective]) -> String {
    let mut out = String::new();
    for (i, obj) in objectives.iter().enumerate() {
        let _ = writeln!(out, "{}. {}: {}", i + 1, obj.title, obj.description);
    }
    out
}

pub fn user_stories(objectives: &[Objective]) -> String {
    format!(
        "You are a product manager helping to create user stories from objectives. \
         Each user story should follow the format: \
         'As a [type of user], I want [goal] so that [benefit]'.\n\n\
         Here are the objectives:\n{}\n\
         Please generate user stories based on these objectives. \
         Focus on the value delivered to different types of users. \
         Return the user stories as a numbered list.",
        objectives_list(objectives)
    )
}

pub fn design(objectives: &[Objective], batches: &[UserStoryBatch]) -> String {
    let mut context = String::from("Here are the project objectives:\n");
    context.push_str(&objectives_list(objectives));
    context.push_str("\nHere are the user stories:\n");
    for batch in batches {
        let _ = writeln!(context, "{}", batch.stories);
        for r in &batch.refined_stories {
            let _ = writeln!(context, "Refined version:\n{}", r.refined_result);
        }
    }

    format!(
        "You are a software architect helping to design classes and their functions. \
         Based on the objectives and user stories, propose a clean and maintainable design.\n\n\
         {context}\n\
         Please provide:\n\
         1. A list of proposed classes with their responsibilities\n\
         2. For each class, list the key methods/functions with:\n\
         \x20  - Method signature\n\
         \x20  - Brief description\n\
         \x20  - Parameters and return types\n\
         \x20  - Any important notes about implementation\n\
         3. Key relationships between classes\n\
         4. Any design patterns that would be beneficial\n\n\
         Focus on creating a modular and extensible design that fulfills the objectives \
         and user stories."
    )
}

/// Follow-up prompt revising the entry's current text.
pub fn refinement<E: Refinable>(entry: &E, feedback: &str) -> String {
    format!(
        "Previous {}:\n{}\n\nRefine based on this feedback: {}",
        E::SUBJECT,
        entry.current_text(),
        feedback
    )
}

fn design_context(entry: &DesignEntry) -> String {
    let mut out = String::from("Objectives:\n");
    for (i, obj) in entry.objectives_snapshot.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({}): {}",
            i + 1,
            obj.title,
            obj.priority,
            obj.description
        );
    }
    out.push_str("\nUser Stories:\n");
    for stories in &entry.user_stories_snapshot {
        let _ = writeln!(out, "{stories}");
    }
    let _ = write!(out, "\nDesign Specification:\n{}\n", entry.current_text());
    out
}

pub fn test_code(entry: &DesignEntry, language: &str, framework: &str) -> String {
    format!(
        "Based on the following design information, generate {language} test code:\n\n\
         {}\n\
         Please generate comprehensive test cases that cover:\n\
         1. Unit tests for each class and method\n\
         2. Integration tests for key interactions\n\
         3. Edge cases and error handling\n\
         4. Basic functionality tests\n\n\
         Use the {framework} framework and follow best practices. \
         Return only the contents of the test file.",
        design_context(entry)
    )
}

pub fn documentation(entry: &DesignEntry) -> String {
    format!(
        "Based on the following design information, generate comprehensive documentation:\n\n\
         {}\n\
         Please generate:\n\
         1. Overview and architecture documentation\n\
         2. API documentation for each class and method\n\
         3. Usage examples\n\
         4. Installation and setup instructions\n\
         5. Troubleshooting guide\n\n\
         Use Markdown format.",
        design_context(entry)
    )
}
