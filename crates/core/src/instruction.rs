use crate::models::{Coordinates, Language};
use crate::protocol::LabelSet;

/// Renders the instruction sent to the text backend. The labels come from
/// the same table the parser compiles, so the requested format and the
/// parsed format cannot diverge.
pub fn system_instruction(labels: &LabelSet, language: Language) -> String {
    let lang = language.as_code().to_uppercase();
    let sep = labels.step_separator;

    format!(
        "You are WAYPOINT, a travel assistant that lists places or routes in a DIRECT and VISUAL way.\n\
         ANSWER THE CONTENT IN LANGUAGE: {lang}.\n\
         \n\
         CONCISENESS RULE:\n\
         - When listing places, do NOT greet, do NOT add an introduction and do NOT explain anything before the list.\n\
         - Go straight to the place data in the format below.\n\
         \n\
         IMPORTANT FOR THE SYSTEM TO WORK:\n\
         For cards to appear on screen you must use EXACTLY the labels below, without translating them, \
         even when the content after them is in another language. Start each label on its own line.\n\
         \n\
         MANDATORY FORMAT FOR EACH PLACE:\n\
         {name} [Place name]\n\
         {description} [In {lang} - one striking sentence]\n\
         {address} [Full address]\n\
         {distance} [Distance from the user, if known]\n\
         {category} [In {lang} - e.g. Restaurant, Hotel]\n\
         {lat} [Numeric latitude]\n\
         {long} [Numeric longitude]\n\
         {instagram} [If available, handle or link]\n\
         {whatsapp} [If available, digits only with area code]\n\
         \n\
         ADDITIONAL RULES:\n\
         - If the user asks for a route, write \"{route}\" followed by \"{itinerary} [Destination]:\", \
         \"{total_distance}\", \"{duration}\" and one line per step starting with \
         \"{step} [Instruction in {lang}] {sep} [Distance]\".\n",
        name = labels.name,
        description = labels.description,
        address = labels.address,
        distance = labels.distance,
        category = labels.category,
        lat = labels.lat,
        long = labels.long,
        instagram = labels.instagram,
        whatsapp = labels.whatsapp,
        route = labels.route_information,
        itinerary = labels.itinerary_to,
        total_distance = labels.total_distance,
        duration = labels.estimated_duration,
        step = labels.step,
    )
}

/// Appends the user's position so the backend can rank nearby places.
pub fn with_location_context(message: &str, location: Option<Coordinates>) -> String {
    match location {
        Some(at) => format!(
            "{message}\n\n[Context Location - Lat: {}, Long: {}]",
            at.latitude, at.longitude
        ),
        None => message.to_string(),
    }
}
