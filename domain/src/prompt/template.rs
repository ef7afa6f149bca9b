//! Prompt templates for the four council stages
//!
//! Every placeholder is filled in a single `format!` pass, so document or
//! response text that happens to contain `{role}`-style tokens is inserted
//! verbatim and never substituted a second time.

use crate::core::role::Role;

/// Inputs shared by every reviewer prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub role: &'a Role,
    pub role_instructions: &'a str,
    pub operational_context: &'a str,
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Stage 1: independent domain review of the document
    pub fn independent_review(ctx: PromptContext<'_>, document: &str) -> String {
        format!(
            r#"{instructions}

{context}

---

You are reviewing the following plan or specification:

{document}

---

Provide your {role} perspective on this plan. Focus on your domain expertise.

Structure your review:
1. **Domain Assessment**: Key observations from your perspective
2. **Strengths**: What is working well
3. **Concerns**: Issues or risks in your domain
4. **Questions**: What you need clarified (if any)
5. **Recommendations**: Specific suggestions

Be direct and actionable. Flag critical issues clearly."#,
            instructions = ctx.role_instructions,
            context = ctx.operational_context,
            document = document,
            role = ctx.role,
        )
    }

    /// Stage 2: cross-domain tensions and questions to other reviewers
    pub fn cross_domain_questions(ctx: PromptContext<'_>, stage1_text: &str) -> String {
        format!(
            r#"{instructions}

{context}

You are the {role}. You have seen the initial reviews from the executive team:

{stage1}

---

Now identify cross-domain tensions and ask clarifying questions.

Your task:
1. Identify where your domain concerns may conflict with others
2. Note areas of implicit disagreement
3. Ask 1-3 specific questions to OTHER executives

Format each question on its own line as:
"Question to [ROLE]: [Your question]"

Example:
"Question to CTO: How does the proposed architecture handle the compliance requirements I flagged?"

Be specific. Good questions surface hidden tensions."#,
            instructions = ctx.role_instructions,
            context = ctx.operational_context,
            role = ctx.role,
            stage1 = stage1_text,
        )
    }

    /// Stage 3: answers to the questions routed to this reviewer
    pub fn targeted_response(
        ctx: PromptContext<'_>,
        stage1_text: &str,
        stage2_text: &str,
        directed_questions: &str,
    ) -> String {
        format!(
            r#"{instructions}

{context}

Previous discussion:

{stage1}

---

Cross-domain questions raised by the team:

{stage2}

---

Questions directed to you ({role}):

{questions}

---

Respond to the questions directed to your role. Be specific and actionable.

If a question reveals a genuine tension, acknowledge it rather than dismissing it.
If you need to defer to another executive, say so explicitly."#,
            instructions = ctx.role_instructions,
            context = ctx.operational_context,
            stage1 = stage1_text,
            stage2 = stage2_text,
            role = ctx.role,
            questions = directed_questions,
        )
    }

    /// Stage 4: final synthesis by the synthesizer seat
    pub fn synthesis(
        ctx: PromptContext<'_>,
        document: &str,
        stage1_text: &str,
        stage2_text: &str,
        stage3_text: &str,
    ) -> String {
        format!(
            r#"You are the {role} synthesizing the executive team's deliberation.

{instructions}

{context}

---

Original Plan:
{document}

---

Executive Reviews (Stage 1):
{stage1}

---

Cross-Domain Questions (Stage 2):
{stage2}

---

Responses (Stage 3):
{stage3}

---

Synthesize into an executive decision. Use this structure:

## Executive Decision
[Clear go/no-go/conditional-go with rationale]

## Key Consensus Points
[Where the team agreed]

## Unresolved Tensions
[Tradeoffs that remain - don't force false consensus]

## Action Items
[Concrete next steps with ownership]
- [ ] [Action] - Owner: [Role]

## Phase Gate Criteria
[What must be true before proceeding to the next phase?]

## What Remains Unknown
[Honest acknowledgment of uncertainties]

Be decisive while honoring the complexity surfaced by your team."#,
            role = ctx.role,
            instructions = ctx.role_instructions,
            context = ctx.operational_context,
            document = document,
            stage1 = stage1_text,
            stage2 = stage2_text,
            stage3 = stage3_text,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: &Role) -> PromptContext<'_> {
        PromptContext {
            role,
            role_instructions: "Guard the security posture.",
            operational_context: "Regulated payments company.",
        }
    }

    #[test]
    fn test_independent_review_contains_inputs() {
        let role = Role::parse("CISO").unwrap();
        let prompt = PromptTemplate::independent_review(ctx(&role), "Migrate to Kafka.");
        assert!(prompt.starts_with("Guard the security posture."));
        assert!(prompt.contains("Regulated payments company."));
        assert!(prompt.contains("Migrate to Kafka."));
        assert!(prompt.contains("Provide your CISO perspective"));
    }

    #[test]
    fn test_document_placeholders_are_not_resubstituted() {
        let role = Role::parse("CTO").unwrap();
        let prompt = PromptTemplate::independent_review(ctx(&role), "Template uses {role} and {document}.");
        assert!(prompt.contains("Template uses {role} and {document}."));
    }

    #[test]
    fn test_stage2_asks_for_routable_format() {
        let role = Role::parse("COO").unwrap();
        let prompt = PromptTemplate::cross_domain_questions(ctx(&role), "### CTO\nfine\n");
        assert!(prompt.contains("Question to [ROLE]: [Your question]"));
        assert!(prompt.contains("### CTO\nfine\n"));
        assert!(prompt.contains("You are the COO."));
    }

    #[test]
    fn test_targeted_response_includes_questions() {
        let role = Role::parse("CTO").unwrap();
        let prompt = PromptTemplate::targeted_response(
            ctx(&role),
            "stage one",
            "stage two",
            "From CPO: Question to CTO: cost?",
        );
        assert!(prompt.contains("stage one"));
        assert!(prompt.contains("stage two"));
        assert!(prompt.contains("Questions directed to you (CTO):\n\nFrom CPO: Question to CTO: cost?"));
    }

    #[test]
    fn test_synthesis_sections() {
        let role = Role::parse("CEO").unwrap();
        let prompt = PromptTemplate::synthesis(ctx(&role), "plan", "s1", "s2", "No responses required.");
        assert!(prompt.starts_with("You are the CEO"));
        assert!(prompt.contains("Responses (Stage 3):\nNo responses required.\n"));
        assert!(prompt.contains("## Executive Decision"));
    }
}
