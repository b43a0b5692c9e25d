//! Default page header and toolbar titles, rendered through the resource's localizer.

use crate::action::Action;
use crate::case::title_case;
use crate::resource::Resource;
use crate::schema::Record;

pub fn header_title<R: Resource + ?Sized>(resource: &R, action: &Action, record: Option<&Record>) -> String {
    let descriptor = resource.descriptor();
    let localizer = &descriptor.services().localizer;
    let domain = descriptor.domain();
    let title = record.map(|r| resource.resource_title(r)).unwrap_or_default();
    match action {
        Action::Show => {
            let name = resource.display_name();
            localizer.render(domain, "%{resource} %{title}", &[("resource", name.as_str()), ("title", title.as_str())])
        }
        Action::New => {
            let name = resource.display_name();
            let verb = title_case(action.as_str());
            localizer.render(domain, "%{action} %{resource}", &[("action", verb.as_str()), ("resource", name.as_str())])
        }
        Action::Edit => {
            let verb = title_case(action.as_str());
            localizer.render(domain, "%{action} %{title}", &[("action", verb.as_str()), ("title", title.as_str())])
        }
        Action::Index => {
            let plural = resource.display_name_plural();
            localizer.render(domain, "%{resources}", &[("resources", plural.as_str())])
        }
        _ => localizer.render(domain, "Unknown action", &[]),
    }
}

pub fn toolbar_title<R: Resource + ?Sized>(resource: &R) -> String {
    let descriptor = resource.descriptor();
    let name = resource.display_name();
    descriptor
        .services()
        .localizer
        .render(descriptor.domain(), "%{resource} listing", &[("resource", name.as_str())])
}
