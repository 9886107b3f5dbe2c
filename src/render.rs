use crate::types::Plan;

/// Renders a plan as a numbered action trace followed by a summary line.
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    for (i, action) in plan.actions.iter().enumerate() {
        out.push_str(&format!("{:>4}. {}\n", i + 1, action));
    }
    out.push_str(&format!(
        "Summary: {} cut{} made\n",
        plan.cuts,
        if plan.cuts == 1 { "" } else { "s" },
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_render_lists_actions_in_order() {
        let plan = Plan {
            cuts: 1,
            actions: vec![
                Action::Cut {
                    piece: 10,
                    take: 4,
                    rest: 6,
                },
                Action::Assign {
                    pieces: vec![4],
                    demand: 4,
                },
            ],
        };
        let output = render_plan(&plan);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("cut 10 into 4 + 6"));
        assert!(lines[1].contains("distribute [4] to demand 4"));
        assert_eq!(lines[2], "Summary: 1 cut made");
    }

    #[test]
    fn test_render_empty_plan() {
        let plan = Plan {
            cuts: 0,
            actions: vec![],
        };
        assert_eq!(render_plan(&plan), "Summary: 0 cuts made\n");
    }
}
