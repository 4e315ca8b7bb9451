//! Canned replies in English and Hindi.
//!
//! Every string the engine sends lives here, so the transition logic stays
//! free of copy and a new locale is one more match arm per function.

use bothive_core::Language;
use bothive_store::Booking;

use crate::session::BookingDraft;

pub fn greeting(lang: Language) -> String {
    match lang {
        Language::En => {
            "👋 Hello! Ask me anything about our services, or say 'book appointment' to schedule a visit.".to_string()
        }
        Language::Hi => {
            "👋 नमस्ते! हमारी सेवाओं के बारे में कुछ भी पूछें, या अपॉइंटमेंट बुक करने के लिए 'book appointment' लिखें।".to_string()
        }
    }
}

pub fn ask_name(lang: Language) -> String {
    match lang {
        Language::En => "👤 Great, let's book your appointment. What is your name?".to_string(),
        Language::Hi => "👤 बढ़िया, चलिए आपकी अपॉइंटमेंट बुक करते हैं। आपका नाम क्या है?".to_string(),
    }
}

pub fn thanks_ask_phone(lang: Language, name: &str) -> String {
    match lang {
        Language::En => format!("📱 Thanks {}! What is your 10-digit mobile number?", name),
        Language::Hi => format!("📱 धन्यवाद {}! आपका 10 अंकों का मोबाइल नंबर क्या है?", name),
    }
}

pub fn invalid_phone(lang: Language) -> String {
    match lang {
        Language::En => "❌ That doesn't look right. Please enter a valid 10-digit mobile number.".to_string(),
        Language::Hi => "❌ यह सही नहीं लग रहा। कृपया 10 अंकों का सही मोबाइल नंबर दर्ज करें।".to_string(),
    }
}

pub fn ask_date(lang: Language) -> String {
    match lang {
        Language::En => "📅 Which date works for you? (e.g. 26, tomorrow, 26/12/2025)".to_string(),
        Language::Hi => "📅 आपके लिए कौन सी तारीख ठीक रहेगी? (जैसे 26, कल, 26/12/2025)".to_string(),
    }
}

pub fn invalid_date(lang: Language) -> String {
    match lang {
        Language::En => "❌ I couldn't read that date. Try something like 26, tomorrow, or 26/12/2025.".to_string(),
        Language::Hi => "❌ मैं वह तारीख समझ नहीं पाया। 26, कल, या 26/12/2025 जैसा कुछ लिखें।".to_string(),
    }
}

pub fn ask_time(lang: Language) -> String {
    match lang {
        Language::En => "⏰ What time would you prefer? (e.g. 10am, 3pm)".to_string(),
        Language::Hi => "⏰ आप कौन सा समय पसंद करेंगे? (जैसे 10am, 3pm)".to_string(),
    }
}

pub fn invalid_time(lang: Language) -> String {
    match lang {
        Language::En => "❌ I couldn't read that time. Try something like 10am or 3pm.".to_string(),
        Language::Hi => "❌ मैं वह समय समझ नहीं पाया। 10am या 3pm जैसा कुछ लिखें।".to_string(),
    }
}

pub fn confirm_summary(lang: Language, draft: &BookingDraft) -> String {
    let name = draft.full_name.as_deref().unwrap_or("-");
    let phone = draft.phone.as_deref().unwrap_or("-");
    let date = draft.preferred_date.as_deref().unwrap_or("-");
    let time = draft.preferred_time.as_deref().unwrap_or("-");
    match lang {
        Language::En => format!(
            "📋 Here is your booking:\n👤 {}\n📱 {}\n📅 {}\n⏰ {}\n\n✅ Shall I confirm it? (yes/no)",
            name, phone, date, time
        ),
        Language::Hi => format!(
            "📋 आपकी बुकिंग:\n👤 {}\n📱 {}\n📅 {}\n⏰ {}\n\n✅ क्या मैं इसे कन्फर्म कर दूं? (yes/no)",
            name, phone, date, time
        ),
    }
}

pub fn booking_created(lang: Language, short_id: &str) -> String {
    match lang {
        Language::En => format!(
            "🎉 Your appointment is booked! Booking ID: {}. We'll see you then.",
            short_id
        ),
        Language::Hi => format!(
            "🎉 आपकी अपॉइंटमेंट बुक हो गई! बुकिंग ID: {}। हम आपका इंतज़ार करेंगे।",
            short_id
        ),
    }
}

pub fn booking_declined(lang: Language) -> String {
    match lang {
        Language::En => "👍 No problem, I've discarded that booking. Say 'book appointment' to start over.".to_string(),
        Language::Hi => "👍 कोई बात नहीं, मैंने वह बुकिंग हटा दी है। फिर से शुरू करने के लिए 'book appointment' लिखें।".to_string(),
    }
}

pub fn ask_phone_for_check(lang: Language) -> String {
    match lang {
        Language::En => "📱 Sure, what is the mobile number the booking was made with?".to_string(),
        Language::Hi => "📱 ज़रूर, बुकिंग किस मोबाइल नंबर से की गई थी?".to_string(),
    }
}

pub fn ask_phone_for_cancel(lang: Language) -> String {
    match lang {
        Language::En => "📱 Which mobile number should I cancel bookings for?".to_string(),
        Language::Hi => "📱 किस मोबाइल नंबर की बुकिंग कैंसिल करनी है?".to_string(),
    }
}

pub fn ask_phone_for_update(lang: Language) -> String {
    match lang {
        Language::En => "📱 Which mobile number is the booking under?".to_string(),
        Language::Hi => "📱 बुकिंग किस मोबाइल नंबर पर है?".to_string(),
    }
}

pub fn booking_found(lang: Language, booking: &Booking) -> String {
    match lang {
        Language::En => format!(
            "🔎 Found your booking:\n👤 {}\n📅 {}\n⏰ {}\n📌 Status: {}",
            booking.full_name,
            booking.preferred_date,
            booking.preferred_time,
            booking.status.as_str()
        ),
        Language::Hi => format!(
            "🔎 आपकी बुकिंग मिल गई:\n👤 {}\n📅 {}\n⏰ {}\n📌 स्थिति: {}",
            booking.full_name,
            booking.preferred_date,
            booking.preferred_time,
            booking.status.as_str()
        ),
    }
}

pub fn booking_not_found(lang: Language) -> String {
    match lang {
        Language::En => "🔍 I couldn't find any booking with that number. Say 'book appointment' to make one.".to_string(),
        Language::Hi => "🔍 उस नंबर पर कोई बुकिंग नहीं मिली। नई बुकिंग के लिए 'book appointment' लिखें।".to_string(),
    }
}

pub fn bookings_cancelled(lang: Language, count: usize) -> String {
    match lang {
        Language::En => format!("🗑️ Done, I've cancelled {} booking(s) for that number.", count),
        Language::Hi => format!("🗑️ हो गया, उस नंबर की {} बुकिंग कैंसिल कर दी गई।", count),
    }
}

pub fn ask_update_details(lang: Language) -> String {
    match lang {
        Language::En => "✏️ What should I change it to? Send a new date, a new time, or both.".to_string(),
        Language::Hi => "✏️ इसे किसमें बदलना है? नई तारीख, नया समय, या दोनों भेजें।".to_string(),
    }
}

pub fn booking_updated(lang: Language, booking: &Booking) -> String {
    match lang {
        Language::En => format!(
            "✅ Updated! Your booking is now on {} at {}.",
            booking.preferred_date, booking.preferred_time
        ),
        Language::Hi => format!(
            "✅ अपडेट हो गया! आपकी बुकिंग अब {} को {} बजे है।",
            booking.preferred_date, booking.preferred_time
        ),
    }
}

pub fn contact_info(lang: Language, tenant_name: &str, website: Option<&str>) -> String {
    let site = website.unwrap_or("our website");
    match lang {
        Language::En => format!(
            "📞 You can reach {} through {}. Or just keep chatting with me here!",
            tenant_name, site
        ),
        Language::Hi => format!(
            "📞 आप {} से {} के ज़रिए संपर्क कर सकते हैं। या यहीं मुझसे बात करते रहें!",
            tenant_name, site
        ),
    }
}

pub fn upload_prompt(lang: Language) -> String {
    match lang {
        Language::En => "📄 I don't have any information yet. Please upload a PDF document first.".to_string(),
        Language::Hi => "📄 मेरे पास अभी कोई जानकारी नहीं है। कृपया पहले एक PDF दस्तावेज़ अपलोड करें।".to_string(),
    }
}

pub fn apology(lang: Language) -> String {
    match lang {
        Language::En => "😔 Sorry, something went wrong on my side. Please try that again.".to_string(),
        Language::Hi => "😔 माफ़ कीजिए, मेरी तरफ़ से कुछ गड़बड़ हो गई। कृपया दोबारा कोशिश करें।".to_string(),
    }
}
