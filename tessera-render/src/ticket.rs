use std::io::Cursor;

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tessera_shared::{Booking, Event, User};
use tracing::warn;

use crate::qr;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const QR_PIXELS: u32 = 150;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Produces the printable ticket document: one A4 page per ticket with
/// an embedded QR code, or a single placeholder page when the booking
/// has no tickets.
pub struct TicketRenderer {
    logo_path: Option<String>,
}

struct PageFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl TicketRenderer {
    pub fn new(logo_path: Option<String>) -> Self {
        Self { logo_path }
    }

    /// Render the booking's tickets. `event` may only be `None` when
    /// the ticket list is empty (there is nothing to resolve it from);
    /// both cases collapse to the placeholder document.
    pub fn render(
        &self,
        booking: &Booking,
        event: Option<&Event>,
        user: &User,
    ) -> Result<Vec<u8>, RenderError> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            "Tessera Tickets",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let fonts = PageFonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(|e| RenderError::Pdf(e.to_string()))?,
        };

        let event = match (event, booking.tickets.first()) {
            (Some(event), Some(_)) => event,
            _ => {
                let layer = doc.get_page(first_page).get_layer(first_layer);
                layer.use_text(
                    "No tickets found for this booking.",
                    12.0,
                    Mm(LEFT_MARGIN_MM),
                    Mm(260.0),
                    &fonts.bold,
                );
                return doc
                    .save_to_bytes()
                    .map_err(|e| RenderError::Pdf(e.to_string()));
            }
        };

        let logo = self.load_logo();

        for (index, ticket) in booking.tickets.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                doc.get_page(page).get_layer(page_layer)
            };

            let mut y = 275.0;

            if let Some(bytes) = &logo {
                if embed_png(&layer, bytes, LEFT_MARGIN_MM, y - 15.0, 150.0) {
                    y -= 20.0;
                }
            }

            layer.use_text(event.name.clone(), 18.0, Mm(LEFT_MARGIN_MM), Mm(y), &fonts.bold);
            y -= 10.0;

            layer.use_text(
                format!("Ticket {} of {}", index + 1, booking.ticket_count),
                14.0,
                Mm(LEFT_MARGIN_MM),
                Mm(y),
                &fonts.bold,
            );
            y -= 8.0;

            layer.use_text(
                format!("Booking ID: {}", booking.id),
                10.0,
                Mm(LEFT_MARGIN_MM),
                Mm(y),
                &fonts.regular,
            );
            y -= 6.0;

            layer.use_text(
                format!("Booked By: {}", user.full_name()),
                10.0,
                Mm(LEFT_MARGIN_MM),
                Mm(y),
                &fonts.regular,
            );
            y -= 10.0;

            layer.use_text("Event Details:", 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &fonts.bold);
            y -= 7.0;

            layer.use_text(
                format!(
                    "Date & Time: {}",
                    event.starts_at.format("%b %d, %Y at %I:%M %p")
                ),
                10.0,
                Mm(LEFT_MARGIN_MM),
                Mm(y),
                &fonts.regular,
            );
            y -= 6.0;

            layer.use_text(
                format!("Venue: {}", event.street_address()),
                10.0,
                Mm(LEFT_MARGIN_MM),
                Mm(y),
                &fonts.regular,
            );
            y -= 6.0;

            if let Some(instructions) = &event.instructions {
                if !instructions.is_empty() {
                    layer.use_text(
                        format!("Instructions: {}", instructions),
                        10.0,
                        Mm(LEFT_MARGIN_MM),
                        Mm(y),
                        &fonts.regular,
                    );
                    y -= 6.0;
                }
            }

            // QR trouble on one ticket must not sink the rest of the
            // document; that page gets an inline notice instead.
            y -= 45.0;
            match qr::png(&ticket.id, QR_PIXELS) {
                Ok(bytes) => {
                    if embed_png(&layer, &bytes, 80.0, y, 96.0) {
                        layer.use_text(
                            format!("Ticket ID: {}", ticket.id),
                            8.0,
                            Mm(80.0),
                            Mm(y - 5.0),
                            &fonts.regular,
                        );
                    } else {
                        layer.use_text(
                            format!("QR Code Error for Ticket ID: {}", ticket.id),
                            10.0,
                            Mm(LEFT_MARGIN_MM),
                            Mm(y),
                            &fonts.regular,
                        );
                    }
                }
                Err(e) => {
                    warn!("Error generating QR code for ticket {}: {}", ticket.id, e);
                    layer.use_text(
                        format!("QR Code Error for Ticket ID: {}", ticket.id),
                        10.0,
                        Mm(LEFT_MARGIN_MM),
                        Mm(y),
                        &fonts.regular,
                    );
                }
            }

            layer.use_text(
                "Thank you for booking with Tessera! Present this ticket at the entrance.",
                8.0,
                Mm(LEFT_MARGIN_MM),
                Mm(12.0),
                &fonts.oblique,
            );
        }

        doc.save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }

    /// Logo bytes are ancillary; a missing or unreadable file just
    /// means pages render without one.
    fn load_logo(&self) -> Option<Vec<u8>> {
        let path = self.logo_path.as_ref()?;
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Error loading logo {} for PDF: {}", path, e);
                None
            }
        }
    }
}

/// Decode PNG bytes through printpdf's bundled image codec and place
/// the picture on the layer. Returns false (after logging) when the
/// bytes do not decode.
fn embed_png(layer: &PdfLayerReference, bytes: &[u8], x_mm: f32, y_mm: f32, dpi: f32) -> bool {
    let decoder = match PngDecoder::new(Cursor::new(bytes)) {
        Ok(decoder) => decoder,
        Err(e) => {
            warn!("Failed to decode PNG for PDF embedding: {}", e);
            return false;
        }
    };

    let image = match Image::try_from(decoder) {
        Ok(image) => image,
        Err(e) => {
            warn!("Failed to embed PNG into PDF: {}", e);
            return false;
        }
    };

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x_mm)),
            translate_y: Some(Mm(y_mm)),
            dpi: Some(dpi),
            ..ImageTransform::default()
        },
    );

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tessera_shared::{BookingStatus, Ticket, UserRole};
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Casey".to_string(),
            last_name: "Customer".to_string(),
            email: "casey@example.com".to_string(),
            phone: None,
            role: UserRole::Customer,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn sample_event() -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Orchestra Night".to_string(),
            description: None,
            organizer_id: Uuid::new_v4(),
            capacity: 100,
            available_tickets: 97,
            ticket_price: 40.0,
            starts_at: Utc::now(),
            address: "12 Concert Hall Way".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            instructions: Some("Doors open 30 minutes early".to_string()),
            category: Some("Music".to_string()),
            attendees: 3,
            banner_image: None,
            location: None,
        }
    }

    fn sample_booking(event_id: Uuid, count: usize) -> Booking {
        let tickets = (0..count).map(|_| Ticket::issue(event_id, 40.0)).collect();
        Booking::new(Uuid::new_v4(), tickets, 40.0 * count as f64)
    }

    #[test]
    fn test_render_one_page_per_ticket() {
        let renderer = TicketRenderer::new(None);
        let event = sample_event();
        let booking = sample_booking(event.id, 3);

        let bytes = renderer
            .render(&booking, Some(&event), &sample_user())
            .unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_render_placeholder_for_empty_booking() {
        let renderer = TicketRenderer::new(None);
        let booking = Booking::new(Uuid::new_v4(), Vec::new(), 0.0);

        let bytes = renderer.render(&booking, None, &sample_user()).unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }

    #[test]
    fn test_missing_logo_degrades_gracefully() {
        let renderer = TicketRenderer::new(Some("/nonexistent/logo.png".to_string()));
        let event = sample_event();
        let booking = sample_booking(event.id, 1);

        let bytes = renderer
            .render(&booking, Some(&event), &sample_user())
            .unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }
}
