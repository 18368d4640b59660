//! Per-bug-type templates
//!
//! One static entry per [`BugType`]. Each entry names the fields that must
//! be present, the people it needs resolved and a render function that fills
//! in the type-specific parts of the payload.

use domain::{BugPayload, BugType, FormInput};

use super::{Person, PersonRole};

/// Group restricting bugs to people handling employee hiring
pub(super) const EMPLOYEE_HIRING_GROUP: &str = "hr";
/// Group restricting bugs to people handling contractor onboarding
pub(super) const CONTRACTOR_HIRING_GROUP: &str = "contractor-hiring";

/// Everything a render function may read
pub(super) struct TemplateContext<'a> {
    pub form: &'a FormInput,
    pub mail_domain: &'a str,
    pub manager: Option<&'a Person>,
    pub buddy: Option<&'a Person>,
}

impl TemplateContext<'_> {
    /// Optional field value, empty when absent
    fn input(&self, field: &str) -> &str {
        self.form.optional(field)
    }

    fn input_or<'b>(&'b self, field: &str, fallback: &'b str) -> &'b str {
        let value = self.input(field);
        if value.trim().is_empty() { fallback } else { value }
    }

    fn person_line(&self, role: PersonRole) -> String {
        let person = match role {
            PersonRole::Manager => self.manager,
            PersonRole::Buddy => self.buddy,
        };
        person.map_or_else(String::new, |p| format!("{} ({})", p.name, p.email))
    }

    fn person_cc(&self, role: PersonRole) -> &str {
        let person = match role {
            PersonRole::Manager => self.manager,
            PersonRole::Buddy => self.buddy,
        };
        person.map_or("", |p| p.bugzilla_email.as_str())
    }

    fn company_email(&self) -> String {
        format!("{}@{}", self.input("username"), self.mail_domain)
    }

    fn end_date(&self) -> &str {
        self.input_or("end_date", "Indefinite")
    }
}

/// A filing template
pub(super) struct BugTemplate {
    pub label: &'static str,
    pub required: &'static [&'static str],
    pub people: &'static [PersonRole],
    pub render: fn(&mut BugPayload, &TemplateContext<'_>),
}

static HARDWARE_REQUEST: BugTemplate = BugTemplate {
    label: "Hardware request",
    required: &["fullname", "start_date", "employee_type", "username", "manager"],
    people: &[PersonRole::Manager, PersonRole::Buddy],
    render: render_hardware_request,
};

static NEW_HIRE_SETUP: BugTemplate = BugTemplate {
    label: "New hire setup",
    required: &["fullname", "start_date", "employee_type", "manager", "location"],
    people: &[PersonRole::Manager, PersonRole::Buddy],
    render: render_new_hire_setup,
};

static CONTRACTOR_SETUP: BugTemplate = BugTemplate {
    label: "Contractor setup",
    required: &["fullname", "start_date", "end_date", "org_name", "manager"],
    people: &[PersonRole::Manager],
    render: render_contractor_setup,
};

static EMAIL_SETUP: BugTemplate = BugTemplate {
    label: "Email account setup",
    required: &["fullname", "username", "manager"],
    people: &[PersonRole::Manager],
    render: render_email_setup,
};

/// Template lookup; exhaustive over the closed set of bug types
pub(super) fn template_for(bug_type: BugType) -> &'static BugTemplate {
    match bug_type {
        BugType::HardwareRequest => &HARDWARE_REQUEST,
        BugType::NewHireSetup => &NEW_HIRE_SETUP,
        BugType::ContractorSetup => &CONTRACTOR_SETUP,
        BugType::EmailSetup => &EMAIL_SETUP,
    }
}

fn render_hardware_request(payload: &mut BugPayload, ctx: &TemplateContext<'_>) {
    let mail_needed = if ctx.form.flag("mail_needed") { "Yes" } else { "No" };
    let machine_needed = if ctx.form.flag("machine_needed") {
        ctx.input("machine_type")
    } else {
        "None"
    };

    payload.summary = format!(
        "Hardware Request - {} ({} - {})",
        ctx.input("fullname"),
        ctx.input("start_date"),
        ctx.end_date()
    );

    payload.append_description(&[
        format!("Name: {}", ctx.input("fullname")),
        format!("Type: {}", ctx.input("employee_type")),
        format!("Personal email: {}", ctx.input("email_address")),
        format!("Company email: {}", ctx.company_email()),
        format!(
            "Work address: {}, {} {} {}, {}",
            ctx.input("address_street"),
            ctx.input("address_city"),
            ctx.input("address_province"),
            ctx.input("address_postal_code"),
            ctx.input("address_country")
        ),
        format!("Manager: {}", ctx.person_line(PersonRole::Manager)),
        format!("Buddy: {}", ctx.person_line(PersonRole::Buddy)),
        format!("Office contact: {}", ctx.input("office_contact")),
        format!("Start date: {}", ctx.input("start_date")),
        format!("End date: {}", ctx.end_date()),
        format!("Mail needed: {mail_needed}"),
        format!("Mail alias: {}", ctx.input("mail_alias")),
        format!("Mail lists: {}", ctx.input("mail_lists")),
        format!("Machine needed: {machine_needed}"),
        format!(
            "Machine special requests: {}",
            ctx.input("machine_special_requests")
        ),
        format!("Comments: {}", ctx.input("other_comments")),
    ]
    .join("\n"));

    payload.add_cc(ctx.person_cc(PersonRole::Manager));
    payload.add_group(EMPLOYEE_HIRING_GROUP);
}

fn render_new_hire_setup(payload: &mut BugPayload, ctx: &TemplateContext<'_>) {
    let location = if ctx.input("location") == "other" {
        ctx.input("location_other")
    } else {
        ctx.input("location")
    };

    payload.summary = format!(
        "New Hire Setup - {} ({})",
        ctx.input("fullname"),
        ctx.input("start_date")
    );

    payload.append_description(&[
        format!("Name: {}", ctx.input("fullname")),
        format!("Type: {}", ctx.input("employee_type")),
        format!("Position: {}", ctx.input("position_title")),
        format!("Manager: {}", ctx.person_line(PersonRole::Manager)),
        format!("Buddy: {}", ctx.person_line(PersonRole::Buddy)),
        format!("Start date: {}", ctx.input("start_date")),
        format!("Location: {location}"),
    ]
    .join("\n"));

    let comments = ctx.input("other_comments");
    if !comments.trim().is_empty() {
        payload.append_description(&format!("Comments: {comments}"));
    }

    payload.add_cc(ctx.person_cc(PersonRole::Manager));
    payload.add_cc(ctx.person_cc(PersonRole::Buddy));
    payload.add_group(EMPLOYEE_HIRING_GROUP);
}

fn render_contractor_setup(payload: &mut BugPayload, ctx: &TemplateContext<'_>) {
    payload.summary = format!(
        "Contractor Setup - {} ({}) ({} - {})",
        ctx.input("fullname"),
        ctx.input("org_name"),
        ctx.input("start_date"),
        ctx.end_date()
    );

    payload.append_description(&[
        format!("Name: {}", ctx.input("fullname")),
        format!("Organization: {}", ctx.input("org_name")),
        format!("Address: {}", ctx.input("org_address")),
        format!("Phone: {}", ctx.input("phone_number")),
        format!("Email: {}", ctx.input("email_address")),
        format!("Manager: {}", ctx.person_line(PersonRole::Manager)),
        format!("Start date: {}", ctx.input("start_date")),
        format!("End date: {}", ctx.end_date()),
        format!("Rate: {}", ctx.input("pay_rate")),
        format!("Payment limit: {}", ctx.input("payment_limit")),
        format!("Statement of work: {}", ctx.input("statement_of_work")),
    ]
    .join("\n"));

    payload.add_cc(ctx.person_cc(PersonRole::Manager));
    payload.add_group(CONTRACTOR_HIRING_GROUP);
}

fn render_email_setup(payload: &mut BugPayload, ctx: &TemplateContext<'_>) {
    payload.summary = format!(
        "Email Account Setup - {} <{}>",
        ctx.input("fullname"),
        ctx.company_email()
    );

    payload.append_description(&[
        format!("Name: {}", ctx.input("fullname")),
        format!("Username: {}", ctx.input("username")),
        format!("Company email: {}", ctx.company_email()),
        format!("Manager: {}", ctx.person_line(PersonRole::Manager)),
        format!("Mail alias: {}", ctx.input("mail_alias")),
        format!("Mail lists: {}", ctx.input("mail_lists")),
    ]
    .join("\n"));

    payload.add_cc(ctx.person_cc(PersonRole::Manager));
}
